//! Connector stack for the hyper transport: TCP with a connect timeout,
//! wrapped in rustls.

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

use crate::ClientConfig;

/// Connector accepting both `http://` and `https://` URLs.
///
/// ALPN offers HTTP/2 and HTTP/1.1; server certificates are checked against
/// the bundled Mozilla roots.
#[must_use]
pub fn https_connector(config: &ClientConfig) -> HttpsConnector<HttpConnector> {
    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config())
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(tcp_connector(config))
}

fn tcp_connector(config: &ClientConfig) -> HttpConnector {
    let mut tcp = HttpConnector::new();
    // the https wrapper decides which schemes are allowed
    tcp.enforce_http(false);
    tcp.set_connect_timeout(Some(config.connect_timeout));
    tcp.set_nodelay(true);
    tcp
}

fn tls_config() -> rustls::ClientConfig {
    let roots = webpki_roots::TLS_SERVER_ROOTS
        .iter()
        .cloned()
        .collect::<rustls::RootCertStore>();

    rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth()
}
