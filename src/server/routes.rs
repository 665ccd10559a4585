use std::io::Cursor;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::json;
use tiny_http::{Header, Method, Response, StatusCode};
use tracing::warn;

use crate::data::image::GrayInput;
use crate::error::{NetworkError, Result};
use crate::network::Network;

/// Status, content type and body of a response before it hits the socket.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Reply {
        match serde_json::to_vec(value) {
            Ok(body) => Reply {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => Reply::error(500, &e.to_string()),
        }
    }

    fn error(status: u16, message: &str) -> Reply {
        Reply {
            status,
            content_type: "application/json",
            body: json!({ "error": message }).to_string().into_bytes(),
        }
    }

    fn not_found() -> Reply {
        Reply {
            status: 404,
            content_type: "text/plain",
            body: b"404 Not Found".to_vec(),
        }
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let len = self.body.len();
        let mut headers = Vec::new();
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], self.content_type.as_bytes()) {
            headers.push(header);
        }
        Response::new(
            StatusCode(self.status),
            headers,
            Cursor::new(self.body),
            Some(len),
            None,
        )
    }
}

#[derive(Serialize)]
struct Info<'a> {
    layer_sizes: &'a [usize],
    output_labels: Vec<String>,
}

/// Canvas color of uploaded drawings.
const BACKGROUND: u8 = 0;

/// Maps one request onto the network.
///
/// - `GET /` describes the layer sizes and output labels.
/// - `GET /network` returns the full JSON snapshot.
/// - `POST /predict` takes an encoded image and answers with a `Prediction`.
pub fn route(method: &Method, url: &str, body: &[u8], network: &Mutex<Network>) -> Reply {
    let path = url.split('?').next().unwrap_or("");

    match (method, path) {
        (Method::Get, "/") => with_network(network, |network| {
            let output_labels = match network.output_labels() {
                Some(labels) => labels.to_vec(),
                None => (0..network.output_size()).map(|i| i.to_string()).collect(),
            };
            Reply::json(
                200,
                &Info {
                    layer_sizes: network.layer_sizes(),
                    output_labels,
                },
            )
        }),
        (Method::Get, "/network") => with_network(network, |network| Reply::json(200, &*network)),
        (Method::Post, "/predict") => predict_image(network, body),
        _ => Reply::not_found(),
    }
}

fn with_network(network: &Mutex<Network>, f: impl FnOnce(&mut Network) -> Reply) -> Reply {
    match network.lock() {
        Ok(mut guard) => f(&mut *guard),
        Err(_) => Reply::error(500, "network lock poisoned"),
    }
}

fn rejected(e: &NetworkError) -> Reply {
    warn!(error = %e, "prediction request rejected");
    Reply::error(400, &e.to_string())
}

/// Decodes outside the lock; only the forward pass holds it.
fn predict_image(network: &Mutex<Network>, bytes: &[u8]) -> Reply {
    let input_size = match network.lock() {
        Ok(guard) => guard.input_size(),
        Err(_) => return Reply::error(500, "network lock poisoned"),
    };
    let input = match decode_input(input_size, bytes) {
        Ok(input) => input,
        Err(e) => return rejected(&e),
    };
    with_network(network, |network| match network.predict(&input.data) {
        Ok(prediction) => Reply::json(200, &prediction),
        Err(e) => rejected(&e),
    })
}

/// Square inputs are treated as drawings and cropped, then resized to fit;
/// other shapes must match exactly.
fn decode_input(input_size: usize, bytes: &[u8]) -> Result<GrayInput> {
    match square_side(input_size) {
        Some(side) => GrayInput::from_drawing(bytes, side, BACKGROUND),
        None => GrayInput::from_bytes(bytes),
    }
}

fn square_side(n: usize) -> Option<u32> {
    let side = (n as f64).sqrt().round() as usize;
    if side * side == n {
        u32::try_from(side).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::Prediction;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};

    fn network() -> Mutex<Network> {
        // 4 inputs (2x2), output 0 driven by pixel brightness.
        let net = Network::from_owned(
            vec![vec![5.0, 5.0, 5.0, 5.0, -5.0, -5.0, -5.0, -5.0]],
            vec![vec![-2.0, 2.0]],
            vec![4, 2],
            Some(vec!["bright".into(), "dark".into()]),
        )
        .unwrap();
        Mutex::new(net)
    }

    fn png(side: u32, value: u8) -> Vec<u8> {
        let img = GrayImage::from_pixel(side, side, Luma([value]));
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_info_route() {
        let reply = route(&Method::Get, "/", b"", &network());
        assert_eq!(reply.status, 200);
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(value["layer_sizes"], json!([4, 2]));
        assert_eq!(value["output_labels"], json!(["bright", "dark"]));
    }

    #[test]
    fn test_predict_route() {
        let net = network();
        let reply = route(&Method::Post, "/predict", &png(2, 255), &net);
        assert_eq!(reply.status, 200);
        let prediction: Prediction = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(prediction.label, "bright");

        let reply = route(&Method::Post, "/predict", &png(2, 1), &net);
        let prediction: Prediction = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(prediction.label, "dark");
    }

    #[test]
    fn test_predict_rejects_empty_canvas() {
        let reply = route(&Method::Post, "/predict", &png(2, BACKGROUND), &network());
        assert_eq!(reply.status, 400);
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert!(value["error"].as_str().unwrap().contains("empty"));
    }

    #[test]
    fn test_predict_crops_small_drawing() {
        // A bright 4x4 mark in the corner of a black 32x32 canvas. Scaled
        // down whole it would average out to "dark"; cropped to the mark
        // plus padding it stays "bright".
        let mut img = GrayImage::new(32, 32);
        for y in 0..4 {
            for x in 0..4 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();

        let reply = route(&Method::Post, "/predict", &bytes, &network());
        assert_eq!(reply.status, 200);
        let prediction: Prediction = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(prediction.label, "bright");
    }

    #[test]
    fn test_predict_resizes_square_inputs() {
        let reply = route(&Method::Post, "/predict?x=1", &png(8, 255), &network());
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn test_predict_rejects_garbage() {
        let reply = route(&Method::Post, "/predict", b"not an image", &network());
        assert_eq!(reply.status, 400);
        let value: serde_json::Value = serde_json::from_slice(&reply.body).unwrap();
        assert!(value["error"].is_string());
    }

    #[test]
    fn test_network_snapshot_route() {
        let reply = route(&Method::Get, "/network", b"", &network());
        assert_eq!(reply.status, 200);
        let net: Network = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(net.layer_sizes(), &[4, 2]);
    }

    #[test]
    fn test_unknown_route() {
        assert_eq!(route(&Method::Get, "/nope", b"", &network()).status, 404);
        assert_eq!(route(&Method::Get, "/predict", b"", &network()).status, 404);
    }

    #[test]
    fn test_decode_input_needs_only_the_input_size() {
        assert_eq!(decode_input(4, &png(8, 200)).unwrap().len(), 4);
        assert_eq!(decode_input(6, &png(2, 200)).unwrap().len(), 4);
        assert!(matches!(decode_input(4, &png(8, 0)), Err(NetworkError::EmptyImage)));
    }

    #[test]
    fn test_square_side() {
        assert_eq!(square_side(784), Some(28));
        assert_eq!(square_side(4), Some(2));
        assert_eq!(square_side(6), None);
    }
}
