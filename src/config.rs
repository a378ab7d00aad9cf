//! Server settings: command line options, falling back to environment
//! variables, falling back to defaults.

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};

use crate::title::Title;
use crate::util::{arg_or_getenv, getenv};


#[derive(clap::Parser, Debug, Default)]
/// Serve, edit and save plain text pages, one file per page.
pub struct Args {
    /// Address to listen on [env: LISTEN_HTTP] [default: 0.0.0.0:8080]
    #[clap(long)]
    pub listen: Option<String>,

    /// Directory holding the `<title>.txt` page files [env: PAGEDIR]
    /// [default: .]
    #[clap(long)]
    pub pagedir: Option<String>,

    /// Directory holding view.html and edit.html [env: TEMPLATEDIR]
    /// [default: templates]
    #[clap(long)]
    pub templatedir: Option<String>,

    /// Directory for access.log and error.log; without it, logging
    /// goes to stderr [env: LOGDIR]
    #[clap(long)]
    pub logdir: Option<String>,

    /// The page `/` redirects to [env: FRONTPAGE] [default: FrontPage]
    #[clap(long)]
    pub front_page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen: String,
    pub pagedir: PathBuf,
    pub templatedir: PathBuf,
    pub logdir: Option<PathBuf>,
    pub front_page: Title,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let listen = arg_or_getenv(args.listen, "LISTEN_HTTP", Some("0.0.0.0:8080"))?;
        let pagedir = arg_or_getenv(args.pagedir, "PAGEDIR", Some("."))?;
        let templatedir = arg_or_getenv(args.templatedir, "TEMPLATEDIR", Some("templates"))?;
        let logdir = match args.logdir {
            Some(d) => Some(d),
            None => getenv("LOGDIR")?,
        };
        let front_page = arg_or_getenv(args.front_page, "FRONTPAGE", Some("FrontPage"))?;
        let config = Config {
            listen,
            pagedir: pagedir.into(),
            templatedir: templatedir.into(),
            logdir: logdir.map(PathBuf::from),
            front_page: Title::new(&front_page).ok_or_else(
                || anyhow!("front page name {front_page:?} is not a valid title \
                            (letters and digits only)"))?,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if !self.pagedir.is_dir() {
            bail!("page directory {:?} does not exist or is not a directory",
                  self.pagedir)
        }
        if !self.templatedir.is_dir() {
            bail!("template directory {:?} does not exist or is not a directory",
                  self.templatedir)
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn args_in(dir: &std::path::Path) -> Args {
        Args {
            listen: Some("127.0.0.1:0".into()),
            pagedir: Some(dir.to_string_lossy().into()),
            templatedir: Some(dir.to_string_lossy().into()),
            logdir: Some("/tmp/logs".into()),
            front_page: Some("Home".into()),
        }
    }

    #[test]
    fn t_from_args() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = Config::from_args(args_in(dir.path()))?;
        assert_eq!(config.listen, "127.0.0.1:0");
        assert_eq!(config.pagedir, dir.path());
        assert_eq!(config.logdir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.front_page.as_str(), "Home");
        Ok(())
    }

    #[test]
    fn t_invalid_front_page() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            front_page: Some("../Home".into()),
            ..args_in(dir.path())
        };
        let e = Config::from_args(args).unwrap_err();
        assert!(e.to_string().contains("not a valid title"), "{e}");
    }

    #[test]
    fn t_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            pagedir: Some(dir.path().join("nope").to_string_lossy().into()),
            ..args_in(dir.path())
        };
        assert!(Config::from_args(args).is_err());
    }
}
