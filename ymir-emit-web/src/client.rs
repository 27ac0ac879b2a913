//! Small REST client that attaches a stored bearer token to every request.

pub fn client_script() -> &'static str {
    r#"
const TOKEN_KEY = "ymirBearerToken";

class YmirApiClient {
  constructor(baseUrl) {
    this.baseUrl = baseUrl || "";
  }

  getToken() {
    return window.localStorage.getItem(TOKEN_KEY);
  }

  setToken(token) {
    if (token) {
      window.localStorage.setItem(TOKEN_KEY, token);
    } else {
      window.localStorage.removeItem(TOKEN_KEY);
    }
  }

  async request(method, path, body) {
    const headers = { "Content-Type": "application/json" };
    const token = this.getToken();
    if (token) {
      headers["Authorization"] = `Bearer ${token}`;
    }
    const response = await fetch(this.baseUrl + path, {
      method,
      headers,
      body: body === undefined ? undefined : JSON.stringify(body),
    });
    if (!response.ok) {
      throw new Error(`${method} ${path} failed with status ${response.status}`);
    }
    const text = await response.text();
    return text ? JSON.parse(text) : null;
  }

  get(path) { return this.request("GET", path); }
  post(path, body) { return this.request("POST", path, body); }
  put(path, body) { return this.request("PUT", path, body); }
  patch(path, body) { return this.request("PATCH", path, body); }
  delete(path) { return this.request("DELETE", path); }
}

const ymirApiClient = new YmirApiClient();
"#
}
