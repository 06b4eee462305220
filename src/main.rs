use std::sync::Mutex;

use actix_web::{web, App, HttpResponse, HttpServer};
use env_logger::Env;
use log::{info, warn};

use group_directory::{open_directory, routes, AdminGate, Config, SqlGroupStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load();
    let gate = AdminGate::new(&config.admin_password).map_err(std::io::Error::other)?;

    let directory = web::Data::new(open_directory(&config).await);
    if let Err(e) = directory.refresh().await {
        warn!("Initial load failed: {}", e);
    }
    let gate = web::Data::new(Mutex::new(gate));

    info!("Server running at http://{}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(directory.clone())
            .app_data(gate.clone())
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Hello, world!") }))
            .configure(routes::routes::configure::<SqlGroupStore>)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
