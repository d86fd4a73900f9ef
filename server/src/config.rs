use std::{fs, net::SocketAddr, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use maplit::hashmap;
use urlshort::{FallbackPolicy, Format, RedirectTable};

/// Redirects configured paths and serves a static directory for the rest.
#[derive(Parser, Debug)]
#[command(name = "urlshort-server", version, about)]
pub struct Args {
    /// YAML, JSON or TOML file of path/url records
    #[arg(short, long, env = "URLSHORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Config notation, when the file extension doesn't say
    #[arg(short, long, env = "URLSHORT_FORMAT")]
    pub format: Option<Format>,

    /// Address to listen on
    #[arg(long, env = "URLSHORT_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Directory served when no redirect matches
    #[arg(long, env = "URLSHORT_STATIC_DIR", default_value = ".")]
    pub static_dir: PathBuf,

    /// Don't run the fallback for requests that were redirected
    #[arg(long, env = "URLSHORT_REDIRECT_ONLY")]
    pub redirect_only: bool,
}

impl Args {
    pub fn policy(&self) -> FallbackPolicy {
        if self.redirect_only {
            FallbackPolicy::OnMiss
        } else {
            FallbackPolicy::Always
        }
    }

    pub fn load_table(&self) -> Result<RedirectTable> {
        let Some(path) = &self.config else {
            return Ok(builtin_table());
        };
        let format = self
            .format
            .or_else(|| Format::from_path(path))
            .ok_or_else(|| anyhow!("can't tell the format of {}, pass --format", path.display()))?;
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let records = format
            .parse(&bytes)
            .with_context(|| format!("parsing {} as {format}", path.display()))?;
        Ok(RedirectTable::from_records(records))
    }
}

fn builtin_table() -> RedirectTable {
    RedirectTable::from(hashmap! {
        "/urlshort-godoc".to_string() =>
            "https://godoc.org/github.com/gophercises/urlshort".to_string(),
        "/yaml-godoc".to_string() =>
            "https://godoc.org/gopkg.in/yaml.v2".to_string(),
    })
}
