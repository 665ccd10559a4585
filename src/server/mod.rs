//! Minimal HTTP front end for a trained network.

pub mod routes;

use std::sync::{Arc, Mutex};

use tiny_http::{Request, Server};
use tracing::{debug, info, warn};

use crate::error::{NetworkError, Result};
use crate::network::Network;
use routes::Reply;

/// Serves `network` on `addr` until the listener shuts down.
///
/// Each request is handled on its own thread; the network sits behind a
/// mutex because a forward pass writes into its scratch buffers.
pub fn serve(addr: &str, network: Network) -> Result<()> {
    let server = Server::http(addr).map_err(|e| NetworkError::Bind {
        addr: addr.to_owned(),
        reason: e.to_string(),
    })?;
    info!(%addr, layers = ?network.layer_sizes(), "serving network");

    let network = Arc::new(Mutex::new(network));
    for request in server.incoming_requests() {
        let network = Arc::clone(&network);
        std::thread::spawn(move || handle(request, &network));
    }
    Ok(())
}

fn handle(mut request: Request, network: &Mutex<Network>) {
    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!(error = %e, "could not read request body");
        return;
    }

    let method = request.method().clone();
    let url = request.url().to_owned();
    let reply: Reply = routes::route(&method, &url, &body, network);
    debug!(%method, %url, status = reply.status, "request");

    if let Err(e) = request.respond(reply.into_response()) {
        warn!(error = %e, "could not send response");
    }
}
