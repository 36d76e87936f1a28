use rusa_perm_select::config::Config;
use rusa_perm_select::db::PgStore;
use rusa_perm_select::engine::Engine;
use rusa_perm_select::error::Error;
use rusa_perm_select::external::RusaClient;
use rusa_perm_select::server::serve;
use rusa_perm_select::sessions::MemorySessions;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = PgStore::new(&config.database_url, config.max_connections).await?;
    let gateway = RusaClient::new(config.rusa_api_base.clone())?;
    let sessions = MemorySessions::new(config.session_ttl);
    let addr = config.listen_addr;

    let engine = Engine::new(config, store, gateway, sessions);

    serve(engine, addr).await
}
