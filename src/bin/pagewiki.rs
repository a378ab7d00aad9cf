use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use clap::Parser as ClapParser;
use rouille::Server;
use pagewiki::apachelog::Logs;
use pagewiki::config::{Args, Config};
use pagewiki::page::PageStore;
use pagewiki::template::Templates;
use pagewiki::webparts::{Wiki, wiki_router, server_handler};
use pagewiki::info;


fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;

    // Parsed once; shared read-only by all request threads from here on.
    let templates = Arc::new(Templates::load(&config.templatedir)?);

    let logs = match &config.logdir {
        Some(logdir) => {
            info!("Logging to dir {logdir:?}");
            Logs::open_in_dir(logdir)?
        }
        None => Logs::stderr(),
    };

    let wiki = Arc::new(Wiki::new(PageStore::new(&config.pagedir), templates));
    let router = Arc::new(wiki_router(wiki, &config.front_page)?);

    let server = Server::new(config.listen.clone(), server_handler(router, logs))
        .map_err(|e| anyhow!("listening on {:?}: {e}", config.listen))?;
    info!("Serving pages from {:?} on http://{}/", config.pagedir, server.server_addr());
    server.run();
    bail!("Server stopped.");
}
