//! Common test harness for the integration tests.
//!
//! [`FakeWarrant`] is a small stateful stand-in for the Warrant service,
//! mounted on a `wiremock` server. It keeps objects and warrants in memory,
//! answers direct (non-inherited) checks and the two query shapes the SDK
//! renders, and paginates listings with index cursors.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use warrant::Client;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate, matchers::any};

/// A running fake service and a client pointed at it.
pub struct TestFixture {
    pub server: MockServer,
    pub client: Client,
    pub fake: FakeWarrant,
}

impl TestFixture {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let fake = FakeWarrant::default();
        Mock::given(any())
            .respond_with(fake.clone())
            .mount(&server)
            .await;
        let client = client_for(&server);
        Self {
            server,
            client,
            fake,
        }
    }
}

/// A client whose API and authorize endpoints both point at `server`.
pub fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .api_key("integration_key")
        .api_endpoint(server.uri())
        .authorize_endpoint(server.uri())
        .self_service_dash_endpoint("https://dash.test")
        .build()
        .expect("client should build")
}

#[derive(Default)]
struct State {
    objects: Vec<Value>,
    warrants: Vec<Value>,
    writes: u64,
    generated: u64,
}

impl State {
    fn token(&mut self) -> String {
        self.writes += 1;
        format!("wt_{}", self.writes)
    }

    fn find_object(&self, object_type: &str, object_id: &str) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o["objectType"] == object_type && o["objectId"] == object_id)
    }
}

/// In-memory Warrant service.
#[derive(Clone, Default)]
pub struct FakeWarrant {
    state: Arc<Mutex<State>>,
}

impl FakeWarrant {
    /// Number of warrants currently stored.
    pub fn warrant_count(&self) -> usize {
        self.state.lock().warrants.len()
    }
}

fn error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"code": status, "message": message}))
}

fn with_token(template: ResponseTemplate, token: String) -> ResponseTemplate {
    template.insert_header("Warrant-Token", token.as_str())
}

fn same_tuple(a: &Value, b: &Value) -> bool {
    a["objectType"] == b["objectType"]
        && a["objectId"] == b["objectId"]
        && a["relation"] == b["relation"]
        && a["subject"]["objectType"] == b["subject"]["objectType"]
        && a["subject"]["objectId"] == b["subject"]["objectId"]
        && a["subject"].get("relation") == b["subject"].get("relation")
}

/// Evaluates the `key == "value"` policies used in the tests.
fn policy_holds(policy: Option<&str>, context: &Value) -> bool {
    let Some(policy) = policy else {
        return true;
    };
    let Some((key, expected)) = policy.split_once("==") else {
        return false;
    };
    let expected = expected.trim().trim_matches('"');
    context.get(key.trim()).and_then(Value::as_str) == Some(expected)
}

fn paginate(items: Vec<Value>, request: &Request) -> Value {
    let param = |name: &str| {
        request
            .url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    let start: usize = param("nextCursor")
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);
    let limit: usize = param("limit").and_then(|l| l.parse().ok()).unwrap_or(25);
    let end = (start + limit).min(items.len());

    let mut page = json!({
        "results": items.get(start..end).unwrap_or_default(),
    });
    if end < items.len() {
        page["nextCursor"] = json!(end.to_string());
    }
    if start > 0 {
        page["prevCursor"] = json!(start.saturating_sub(limit).to_string());
    }
    page
}

impl FakeWarrant {
    fn objects(&self, request: &Request, segments: &[String]) -> ResponseTemplate {
        let mut state = self.state.lock();
        let method = request.method.as_str();

        match (method, segments) {
            ("POST", []) => {
                let body: Value = match serde_json::from_slice(&request.body) {
                    Ok(body) => body,
                    Err(_) => return error(400, "invalid body"),
                };
                let batch = body.is_array();
                let items = match body {
                    Value::Array(items) => items,
                    single => vec![single],
                };
                let mut created = Vec::new();
                for mut item in items {
                    if item.get("objectId").is_none() {
                        state.generated += 1;
                        item["objectId"] = json!(format!("gen_{}", state.generated));
                    }
                    let object_type = item["objectType"].as_str().unwrap_or_default().to_owned();
                    let object_id = item["objectId"].as_str().unwrap_or_default().to_owned();
                    if state.find_object(&object_type, &object_id).is_some() {
                        return error(409, "object already exists");
                    }
                    item["createdAt"] = json!("2024-01-01T00:00:00Z");
                    state.objects.push(item.clone());
                    created.push(item);
                }
                let token = state.token();
                let body = if batch {
                    Value::Array(created)
                } else {
                    created.remove(0)
                };
                with_token(ResponseTemplate::new(200).set_body_json(body), token)
            }
            ("DELETE", []) => {
                let refs: Vec<Value> = serde_json::from_slice(&request.body).unwrap_or_default();
                for r in &refs {
                    let object_type = r["objectType"].as_str().unwrap_or_default();
                    let object_id = r["objectId"].as_str().unwrap_or_default();
                    if let Some(i) = state.find_object(object_type, object_id) {
                        state.objects.remove(i);
                    }
                }
                let token = state.token();
                with_token(ResponseTemplate::new(200), token)
            }
            ("GET", []) => {
                let filter = request
                    .url
                    .query_pairs()
                    .find(|(k, _)| k == "objectType")
                    .map(|(_, v)| v.into_owned());
                let items = state
                    .objects
                    .iter()
                    .filter(|o| filter.as_deref().is_none_or(|t| o["objectType"] == t))
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(paginate(items, request))
            }
            ("GET", [object_type, object_id]) => match state.find_object(object_type, object_id) {
                Some(i) => ResponseTemplate::new(200).set_body_json(state.objects[i].clone()),
                None => error(404, "object not found"),
            },
            ("PUT", [object_type, object_id]) => {
                let Some(i) = state.find_object(object_type, object_id) else {
                    return error(404, "object not found");
                };
                let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
                match body.get("meta") {
                    Some(meta) => state.objects[i]["meta"] = meta.clone(),
                    None => {
                        if let Some(map) = state.objects[i].as_object_mut() {
                            map.remove("meta");
                        }
                    }
                }
                ResponseTemplate::new(200).set_body_json(state.objects[i].clone())
            }
            ("DELETE", [object_type, object_id]) => {
                let Some(i) = state.find_object(object_type, object_id) else {
                    return error(404, "object not found");
                };
                state.objects.remove(i);
                state.warrants.retain(|w| {
                    !((w["objectType"] == object_type.as_str()
                        && w["objectId"] == object_id.as_str())
                        || (w["subject"]["objectType"] == object_type.as_str()
                            && w["subject"]["objectId"] == object_id.as_str()))
                });
                let token = state.token();
                with_token(ResponseTemplate::new(200), token)
            }
            _ => error(405, "method not allowed"),
        }
    }

    fn warrants(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();

        match request.method.as_str() {
            "POST" => {
                let batch = body.is_array();
                let items = match body {
                    Value::Array(items) => items,
                    single => vec![single],
                };
                for item in &items {
                    if state.warrants.iter().any(|w| same_tuple(w, item)) {
                        return error(409, "warrant already exists");
                    }
                }
                state.warrants.extend(items.iter().cloned());
                let token = state.token();
                let body = if batch {
                    Value::Array(items)
                } else {
                    items.into_iter().next().unwrap_or_default()
                };
                with_token(ResponseTemplate::new(200).set_body_json(body), token)
            }
            "DELETE" => {
                let items = match body {
                    Value::Array(items) => items,
                    single => vec![single],
                };
                let before = state.warrants.len();
                state
                    .warrants
                    .retain(|w| !items.iter().any(|item| same_tuple(w, item)));
                if state.warrants.len() == before {
                    return error(404, "warrant not found");
                }
                let token = state.token();
                with_token(ResponseTemplate::new(200), token)
            }
            "GET" => {
                let param = |name: &str| {
                    request
                        .url
                        .query_pairs()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.into_owned())
                };
                let object_type = param("objectType");
                let object_id = param("objectId");
                let subject_id = param("subjectId");
                let items = state
                    .warrants
                    .iter()
                    .filter(|w| object_type.as_deref().is_none_or(|t| w["objectType"] == t))
                    .filter(|w| object_id.as_deref().is_none_or(|id| w["objectId"] == id))
                    .filter(|w| {
                        subject_id
                            .as_deref()
                            .is_none_or(|id| w["subject"]["objectId"] == id)
                    })
                    .cloned()
                    .collect();
                ResponseTemplate::new(200).set_body_json(paginate(items, request))
            }
            _ => error(405, "method not allowed"),
        }
    }

    fn query(&self, request: &Request) -> ResponseTemplate {
        let state = self.state.lock();
        let Some(q) = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned())
        else {
            return error(400, "missing query");
        };
        let words: Vec<&str> = q.split_whitespace().collect();

        let meta_of = |object_type: &Value, object_id: &Value| {
            state
                .objects
                .iter()
                .find(|o| &o["objectType"] == object_type && &o["objectId"] == object_id)
                .and_then(|o| o.get("meta").cloned())
        };
        let row = |object_type: &Value, object_id: &Value, warrant: &Value| {
            let mut row = json!({
                "objectType": object_type,
                "objectId": object_id,
                "warrant": warrant,
                "isImplicit": false,
            });
            if let Some(meta) = meta_of(object_type, object_id) {
                row["meta"] = meta;
            }
            row
        };

        let rows: Vec<Value> = match words.as_slice() {
            // select <type> where <stype>:<sid> is <rel|*>
            ["select", object_type, "where", subject, "is", relation] => {
                let Some((subject_type, subject_id)) = subject.split_once(':') else {
                    return error(400, "bad subject");
                };
                state
                    .warrants
                    .iter()
                    .filter(|w| w["objectType"] == *object_type)
                    .filter(|w| *relation == "*" || w["relation"] == *relation)
                    .filter(|w| {
                        w["subject"]["objectType"] == subject_type
                            && w["subject"]["objectId"] == subject_id
                    })
                    .map(|w| row(&w["objectType"], &w["objectId"], w))
                    .collect()
            }
            // select <rel|*> of type <stype> for <otype>:<oid>
            ["select", relation, "of", "type", subject_type, "for", object] => {
                let Some((object_type, object_id)) = object.split_once(':') else {
                    return error(400, "bad object");
                };
                state
                    .warrants
                    .iter()
                    .filter(|w| w["objectType"] == object_type && w["objectId"] == object_id)
                    .filter(|w| *relation == "*" || w["relation"] == *relation)
                    .filter(|w| w["subject"]["objectType"] == *subject_type)
                    .map(|w| row(&w["subject"]["objectType"], &w["subject"]["objectId"], w))
                    .collect()
            }
            _ => return error(400, "unsupported query"),
        };
        ResponseTemplate::new(200).set_body_json(paginate(rows, request))
    }

    fn authorize(&self, request: &Request) -> ResponseTemplate {
        let state = self.state.lock();
        let body: Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return error(400, "invalid body"),
        };
        let checks = body["warrants"].as_array().cloned().unwrap_or_default();
        let passes = |check: &Value| {
            state.warrants.iter().any(|w| {
                same_tuple(w, check)
                    && policy_holds(
                        w.get("policy").and_then(Value::as_str),
                        check.get("context").unwrap_or(&Value::Null),
                    )
            })
        };
        let authorized = match body["op"].as_str() {
            Some("anyOf") => checks.iter().any(passes),
            _ => !checks.is_empty() && checks.iter().all(passes),
        };
        ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "result": if authorized { "Authorized" } else { "Not Authorized" },
            "isImplicit": false,
        }))
    }

    fn sessions(&self) -> ResponseTemplate {
        let mut state = self.state.lock();
        let token = state.token();
        ResponseTemplate::new(200).set_body_json(json!({"token": format!("sess_{}", token)}))
    }
}

impl Respond for FakeWarrant {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if request.headers.get("authorization").and_then(|v| v.to_str().ok())
            != Some("ApiKey integration_key")
        {
            return error(401, "invalid api key");
        }

        let segments: Vec<String> = request
            .url
            .path_segments()
            .map(|s| {
                s.filter(|s| !s.is_empty())
                    .map(|s| {
                        urlencoding::decode(s)
                            .map(|d| d.into_owned())
                            .unwrap_or_else(|_| s.to_owned())
                    })
                    .collect()
            })
            .unwrap_or_default();

        match segments.as_slice() {
            [v, objects, rest @ ..] if v == "v2" && objects == "objects" => {
                self.objects(request, rest)
            }
            [v, warrants] if v == "v1" && warrants == "warrants" => self.warrants(request),
            [v, query] if v == "v2" && query == "query" => self.query(request),
            [v, authorize] if v == "v2" && authorize == "authorize" => self.authorize(request),
            [v, sessions] if v == "v1" && sessions == "sessions" => self.sessions(),
            _ => error(404, "no such route"),
        }
    }
}
