#[actix_web::main]
async fn main() -> std::io::Result<()> {
    zeladoria_server::run().await
}
