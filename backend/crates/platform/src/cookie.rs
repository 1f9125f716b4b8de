//! Cookie Management Infrastructure
//!
//! Common cookie handling utilities and configuration. Produces plain
//! `Set-Cookie` header strings so callers stay framework-agnostic.

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut cookie = format!("{}={}", self.name, value);

        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));

        if let Some(max_age) = self.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self) -> String {
        format!("{}=; HttpOnly; Path={}; Max-Age=0", self.name, self.path)
    }
}
