#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), lab_site::server::ServerError> {
    lab_site::server::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    lab_site::frontend::run();
}
