use std::{
    env,
    process::exit,
};

use hkp_client::{KeyServer, Result};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let url = env::args()
        .nth(1).expect("Usage: hkp-get <URL> <KEYID>");
    let key_id = env::args()
        .nth(2).expect("Usage: hkp-get <URL> <KEYID>");

    let keyserver = KeyServer::new(&url)?;

    // Print the armored key, if the server has it.
    match keyserver.get(key_id.as_str()).await? {
        Some(key) => print!("{}", key),
        None => {
            eprintln!("No key matching {}.", key_id);
            exit(1);
        },
    }
    Ok(())
}
