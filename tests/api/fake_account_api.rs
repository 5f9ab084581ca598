//! A stateful stand-in for the account API, answering the handful of
//! endpoints the scenario touches the way the real server does.
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wiremock::{Request, Respond, ResponseTemplate};

pub const GUARDIAN_USERNAME: &str = "Graatand";
pub const DEPARTMENT_USERNAME: &str = "Tobias";
pub const SEED_PASSWORD: &str = "password";

/// Deviations from the expected server behavior, used to check that the
/// scenario notices them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quirks {
    pub deleted_users_can_log_in: bool,
    pub anonymous_registration_allowed: bool,
}

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub department_id: Option<i64>,
    pub deleted: bool,
    reset_token: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<FakeUser>,
    sessions: HashMap<String, String>,
}

#[derive(Clone)]
pub struct FakeAccountApi {
    state: Arc<Mutex<State>>,
    quirks: Quirks,
}

impl FakeAccountApi {
    pub fn seeded(quirks: Quirks) -> Self {
        let mut state = State::default();
        state.users.push(user(GUARDIAN_USERNAME, SEED_PASSWORD, "Guardian", None));
        state
            .users
            .push(user(DEPARTMENT_USERNAME, SEED_PASSWORD, "Department", Some(1)));
        Self {
            state: Arc::new(Mutex::new(state)),
            quirks,
        }
    }

    pub fn user_named(&self, username: &str) -> Option<FakeUser> {
        let state = self.state.lock().unwrap();
        state.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn users_starting_with(&self, prefix: &str) -> Vec<FakeUser> {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .filter(|u| u.username.starts_with(prefix))
            .cloned()
            .collect()
    }
}

fn user(username: &str, password: &str, role: &str, department_id: Option<i64>) -> FakeUser {
    FakeUser {
        id: Uuid::new_v4().to_string(),
        username: username.into(),
        password: password.into(),
        role: role.into(),
        department_id,
        deleted: false,
        reset_token: None,
    }
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "success": true,
        "errorKey": "NoError",
        "data": data,
    }))
}

fn fail(status: u16, error_key: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(serde_json::json!({
        "success": false,
        "errorKey": error_key,
        "data": null,
    }))
}

fn body(request: &Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).unwrap_or(serde_json::Value::Null)
}

fn text<'a>(body: &'a serde_json::Value, field: &str) -> &'a str {
    body[field].as_str().unwrap_or_default()
}

fn profile(user: &FakeUser) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "username": user.username,
        "roleName": user.role,
    })
}

impl State {
    fn caller(&self, request: &Request) -> Option<FakeUser> {
        let token = request
            .headers
            .get("Authorization")?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let user_id = self.sessions.get(token)?;
        self.users
            .iter()
            .find(|u| &u.id == user_id && !u.deleted)
            .cloned()
    }

    fn live_user_mut(&mut self, id: &str) -> Option<&mut FakeUser> {
        self.users.iter_mut().find(|u| u.id == id && !u.deleted)
    }

    fn login(&mut self, request: &Request, quirks: Quirks) -> ResponseTemplate {
        let body = body(request);
        let found = self.users.iter().find(|u| {
            u.username == text(&body, "username")
                && u.password == text(&body, "password")
                && (!u.deleted || quirks.deleted_users_can_log_in)
        });
        match found {
            Some(user) => {
                let token = Uuid::new_v4().to_string();
                self.sessions.insert(token.clone(), user.id.clone());
                ok(serde_json::json!(token))
            }
            None => fail(401, "InvalidCredentials"),
        }
    }

    fn register(&mut self, request: &Request, quirks: Quirks) -> ResponseTemplate {
        match self.caller(request) {
            None if !quirks.anonymous_registration_allowed => return fail(404, "NotFound"),
            Some(caller) if caller.role == "Citizen" => return fail(403, "NotAuthorized"),
            _ => {}
        }
        let body = body(request);
        let username = text(&body, "username");
        if self.users.iter().any(|u| u.username == username) {
            return fail(409, "UserAlreadyExists");
        }
        let new_user = user(
            username,
            text(&body, "password"),
            text(&body, "role"),
            body["departmentId"].as_i64(),
        );
        self.users.push(new_user);
        ok(serde_json::Value::Null)
    }

    fn delete(&mut self, request: &Request, id: &str) -> ResponseTemplate {
        let Some(caller) = self.caller(request) else {
            return fail(401, "NotAuthorized");
        };
        if caller.role == "Citizen" {
            return fail(404, "NotFound");
        }
        match self.live_user_mut(id) {
            Some(target) => {
                target.deleted = true;
                ok(serde_json::Value::Null)
            }
            None => fail(404, "UserNotFound"),
        }
    }

    fn reset_token(&mut self, request: &Request, id: &str) -> ResponseTemplate {
        match self.caller(request) {
            Some(caller) if caller.role != "Citizen" => {}
            _ => return fail(401, "NotAuthorized"),
        }
        match self.live_user_mut(id) {
            Some(target) => {
                let token = Uuid::new_v4().to_string();
                target.reset_token = Some(token.clone());
                ok(serde_json::json!(token))
            }
            None => fail(404, "UserNotFound"),
        }
    }

    fn reset_password(&mut self, request: &Request, id: &str) -> ResponseTemplate {
        if self.caller(request).is_none() {
            return fail(401, "NotAuthorized");
        }
        let body = body(request);
        let Some(target) = self.live_user_mut(id) else {
            return fail(404, "UserNotFound");
        };
        if target.reset_token.as_deref() != Some(text(&body, "token")) {
            return fail(400, "InvalidProperties");
        }
        target.password = text(&body, "password").to_string();
        target.reset_token = None;
        ok(serde_json::Value::Null)
    }
}

impl Respond for FakeAccountApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let segments: Vec<&str> = request
            .url
            .path()
            .trim_matches('/')
            .split('/')
            .collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("POST", ["v1", "Account", "login"]) => state.login(request, self.quirks),
            ("POST", ["v1", "Account", "register"]) => state.register(request, self.quirks),
            ("DELETE", ["v1", "Account", "user", id]) => state.delete(request, id),
            ("GET", ["v1", "User"]) => match state.caller(request) {
                Some(caller) => ok(profile(&caller)),
                None => fail(401, "NotAuthorized"),
            },
            ("GET", ["v1", "User", id]) => {
                if state.caller(request).is_none() {
                    return fail(401, "NotAuthorized");
                }
                match state.users.iter().find(|u| u.id == *id && !u.deleted) {
                    Some(target) => ok(profile(target)),
                    None => fail(404, "UserNotFound"),
                }
            }
            ("GET", ["v1", "User", id, "Account", "password-reset-token"]) => {
                state.reset_token(request, id)
            }
            ("POST", ["v1", "User", id, "Account", "password"]) => {
                state.reset_password(request, id)
            }
            _ => fail(404, "NotFound"),
        }
    }
}
