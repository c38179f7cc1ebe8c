use std::env;

use hkp_client::{KeyServer, Result, SearchRequest};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let url = env::args()
        .nth(1).expect("Usage: hkp-search <URL> <QUERY>");
    let query = env::args()
        .nth(2).expect("Usage: hkp-search <URL> <QUERY>");

    let keyserver = KeyServer::new(&url)?;
    let index = keyserver.search(SearchRequest::new(query)).await?;

    eprintln!("{} matching keys:", index.count());
    for entry in index.entries() {
        let created = entry.pub_().creation_date()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("{:16} {:4} bit algo {:2} {:10} {}",
                 entry.pub_().key_id(),
                 entry.pub_().key_len(),
                 entry.pub_().algo(),
                 created,
                 entry.uid().uid());
    }
    Ok(())
}
