#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fieldsift_lib::run().await
}
