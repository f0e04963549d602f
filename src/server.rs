use std::io::Cursor;

use serde_json::{Map, Value, json};
use tiny_http::{Header, Method, Request, Response};
use tracing::{debug, info, warn};

use crate::error::{GatewayError, PersistError, ServerError};
use crate::gateway::{AddRequest, Gateway};

type JsonResponse = Response<Cursor<Vec<u8>>>;

fn json_response(status: u16, body: Value) -> JsonResponse {
    let resp = Response::from_string(body.to_string()).with_status_code(status);
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json; charset=utf-8"[..]) {
        Ok(header) => resp.with_header(header),
        Err(()) => resp,
    }
}

fn error_response(status: u16, message: impl std::fmt::Display) -> JsonResponse {
    json_response(status, json!({ "error": message.to_string() }))
}

fn gateway_error_response(err: GatewayError) -> JsonResponse {
    let status = match &err {
        GatewayError::NotFound(_) => 404,
        GatewayError::InvalidRequest(_) => 400,
        GatewayError::PersistenceDisabled => 409,
        GatewayError::Persist(PersistError::Missing { .. }) => 404,
        GatewayError::Persist(PersistError::Serialization { .. }) => 422,
        GatewayError::Persist(PersistError::Io { .. }) => 500,
    };
    if status >= 500 {
        warn!("{}", err);
    }
    error_response(status, err)
}

/// Binds an HTTP server to `addr`. Pass the result to [`run_server`] to begin serving.
pub fn init_server(addr: &str) -> Result<tiny_http::Server, ServerError> {
    let server = tiny_http::Server::http(addr).map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    info!("listening on http://{}", server.server_addr());
    Ok(server)
}

/// Serve requests until the server is dropped, one thread per request.
pub fn run_server(server: tiny_http::Server, gateway: Gateway) {
    for request in server.incoming_requests() {
        let gateway = gateway.clone();
        std::thread::spawn(move || {
            let mut req = request;
            let resp = handle(&gateway, &mut req);
            if let Err(e) = req.respond(resp) {
                warn!("failed to send response: {}", e);
            }
        });
    }
}

/// Split `url` into a route prefix and an optional percent-decoded word.
fn parse_path(url: &str) -> Result<(&str, Option<String>), JsonResponse> {
    let path = url.split('?').next().unwrap_or_default();
    for prefix in ["/get/", "/remove/"] {
        if let Some(raw) = path.strip_prefix(prefix) {
            if raw.is_empty() {
                return Err(error_response(400, "missing word in path"));
            }
            let word = urlencoding::decode(raw)
                .map_err(|_| error_response(400, "word is not valid utf-8"))?;
            return Ok((prefix, Some(word.into_owned())));
        }
    }
    Ok((path, None))
}

fn handle(gateway: &Gateway, req: &mut Request) -> JsonResponse {
    let method = req.method().clone();
    let url = req.url().to_string();
    debug!("{} {}", method.as_str(), url);

    let (route, word) = match parse_path(&url) {
        Ok(parsed) => parsed,
        Err(resp) => return resp,
    };

    match (&method, route, word) {
        (Method::Get, "/health", None) => json_response(200, json!({ "status": "ok" })),
        (Method::Get, "/list", None) => {
            let words: Map<String, Value> = gateway
                .list()
                .into_iter()
                .map(|e| (e.word, Value::String(e.definition)))
                .collect();
            json_response(200, Value::Object(words))
        }
        (Method::Get, "/get/", Some(word)) => match gateway.get(&word) {
            Ok(entry) => json_response(200, json!(entry)),
            Err(e) => gateway_error_response(e),
        },
        (Method::Post, "/add", None) => {
            let mut body = String::new();
            if let Err(e) = req.as_reader().read_to_string(&mut body) {
                warn!("failed to read body: {}", e);
                return error_response(400, "unreadable body");
            }
            let add: AddRequest = match serde_json::from_str(&body) {
                Ok(add) => add,
                Err(e) => return error_response(400, format!("invalid json: {e}")),
            };
            match gateway.add(add) {
                Ok(entry) => json_response(201, json!(entry)),
                Err(e) => gateway_error_response(e),
            }
        }
        (Method::Delete, "/remove/", Some(word)) => {
            gateway.remove(&word);
            json_response(200, json!({ "status": "removed", "word": word }))
        }
        (Method::Post, "/save", None) => match gateway.save() {
            Ok(count) => json_response(200, json!({ "saved": count })),
            Err(e) => gateway_error_response(e),
        },
        (Method::Post, "/load", None) => match gateway.load() {
            Ok(count) => json_response(200, json!({ "loaded": count })),
            Err(e) => gateway_error_response(e),
        },
        (_, "/health" | "/list" | "/get/" | "/add" | "/remove/" | "/save" | "/load", _) => {
            error_response(405, format!("method {} not allowed", method.as_str()))
        }
        _ => error_response(404, format!("no route for {}", url)),
    }
}
