//! HTTPS listener backed by axum-server with rustls.

use std::net::SocketAddr;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::net::http::build_plain_app;
use crate::servers::HttpsServerOptions;

/// Load TLS configuration from certificate and key files.
async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Spawn the HTTPS listener. Fire-and-forget: TLS or bind errors are logged
/// and the listener never acknowledges.
pub(crate) fn spawn_https(options: HttpsServerOptions) {
    tokio::spawn(async move {
        let tls = match load_tls_config(&options.cert, &options.key).await {
            Ok(tls) => tls,
            Err(error) => {
                tracing::error!(port = options.port, error = %error, "Failed to load TLS material");
                return;
            }
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], options.port));
        let handle = axum_server::Handle::new();

        // the handle resolves once the socket is bound
        let bound = handle.clone();
        let ack = options.on_listening;
        let port = options.port;
        let cluster = options.cluster;
        tokio::spawn(async move {
            if bound.listening().await.is_some() {
                tracing::info!(port, cluster, "HTTPS server listening");
                ack.listening();
            }
        });

        let app = build_plain_app(options.handler);
        if let Err(error) = axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
        {
            tracing::error!(error = %error, "HTTPS server terminated");
        }
    });
}
