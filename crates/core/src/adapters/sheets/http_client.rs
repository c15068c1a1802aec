use google_sheets4::{hyper, hyper_rustls};

pub type HttpsConnector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;
pub type HttpClient = hyper::Client<HttpsConnector>;

pub fn http_client() -> HttpClient {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .https_only()
        .enable_http1()
        .build();
    hyper::Client::builder().build(connector)
}
