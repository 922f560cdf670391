use google_sheets4::hyper::client::HttpConnector;
use google_sheets4::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use google_sheets4::{hyper, oauth2};

/// Connector shared by the Sheets hub and the authenticator.
pub type Connector = HttpsConnector<HttpConnector>;

/// HTTP client shared by the Sheets hub and the authenticator.
pub type HttpClient = hyper::Client<Connector>;

/// Authenticator handed to the Sheets hub.
pub type SessionAuthenticator = oauth2::authenticator::Authenticator<Connector>;

/// Build an HTTP/1 client trusting the platform's root certificates.
///
/// Plain `http` is accepted so endpoints can point at a local server.
pub fn https_client() -> HttpClient {
    hyper::Client::builder().build(
        HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build(),
    )
}
