//! Base-URL resolution and preview-deployment detection.
//!
//! Resolution is pure and total: it never fails and always yields a URL.

use safemom_types::ExecutionContext;

/// Deployment host (no scheme); resolved as `https://<host>`.
pub const DEPLOYMENT_URL_VAR: &str = "SAFEMOM_DEPLOYMENT_URL";
/// Public base URL override, used verbatim.
pub const PUBLIC_BASE_URL_VAR: &str = "SAFEMOM_PUBLIC_BASE_URL";
/// Preview deployment host (no scheme); resolved as `https://<host>`.
pub const PREVIEW_URL_VAR: &str = "SAFEMOM_PREVIEW_URL";
/// Deployment environment name; `preview` marks a preview deployment.
pub const DEPLOYMENT_ENV_VAR: &str = "SAFEMOM_DEPLOYMENT_ENV";
/// Final fallback when nothing else is configured.
pub const LOCAL_BASE_URL: &str = "http://localhost:3000";

/// Environment lookup used by resolution; injectable for tests.
pub type EnvLookup = fn(&str) -> Option<String>;

/// Reads the process environment, treating empty values as unset.
#[must_use]
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the origin requests are sent to.
///
/// Browser contexts use their own origin. Server contexts walk
/// deployment URL, public base URL, preview URL, then localhost.
#[must_use]
pub fn resolve_base_url(context: &ExecutionContext, env: EnvLookup) -> String {
    let base = match context {
        ExecutionContext::Browser { origin } => origin.clone(),
        _ => server_base_url(env),
    };
    base.trim_end_matches('/').to_string()
}

fn server_base_url(env: EnvLookup) -> String {
    env(DEPLOYMENT_URL_VAR)
        .map(|host| with_https(&host))
        .or_else(|| env(PUBLIC_BASE_URL_VAR))
        .or_else(|| env(PREVIEW_URL_VAR).map(|host| with_https(&host)))
        .unwrap_or_else(|| LOCAL_BASE_URL.to_string())
}

fn with_https(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Whether the current deployment is a preview build.
#[must_use]
pub fn is_preview_deployment(context: &ExecutionContext, env: EnvLookup) -> bool {
    match context {
        ExecutionContext::Browser { origin } => {
            origin.contains("vercel.app")
                && (origin.contains("-git-") || origin.contains("-vercel-app"))
        }
        _ => env(DEPLOYMENT_ENV_VAR).is_some_and(|v| v.eq_ignore_ascii_case("preview")),
    }
}

/// Join a base URL and a path that starts with `/`.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty(_: &str) -> Option<String> {
        None
    }

    fn deployment(key: &str) -> Option<String> {
        match key {
            DEPLOYMENT_URL_VAR => Some("safemom-abc.vercel.app".into()),
            PUBLIC_BASE_URL_VAR => Some("https://safemom.app".into()),
            _ => None,
        }
    }

    fn public_and_preview(key: &str) -> Option<String> {
        match key {
            PUBLIC_BASE_URL_VAR => Some("https://safemom.app/".into()),
            PREVIEW_URL_VAR => Some("safemom-git-feature.vercel.app".into()),
            DEPLOYMENT_ENV_VAR => Some("preview".into()),
            _ => None,
        }
    }

    fn preview_only(key: &str) -> Option<String> {
        (key == PREVIEW_URL_VAR).then(|| "safemom-git-feature.vercel.app".into())
    }

    #[test]
    fn server_fallback_chain() {
        let server = ExecutionContext::Server;
        assert_eq!(
            resolve_base_url(&server, deployment),
            "https://safemom-abc.vercel.app"
        );
        assert_eq!(
            resolve_base_url(&server, public_and_preview),
            "https://safemom.app"
        );
        assert_eq!(
            resolve_base_url(&server, preview_only),
            "https://safemom-git-feature.vercel.app"
        );
        assert_eq!(resolve_base_url(&server, empty), LOCAL_BASE_URL);
    }

    #[test]
    fn browser_uses_origin() {
        let ctx = ExecutionContext::Browser {
            origin: "https://safemom.app".into(),
        };
        assert_eq!(resolve_base_url(&ctx, deployment), "https://safemom.app");
        assert!(!is_preview_deployment(&ctx, public_and_preview));

        let preview = ExecutionContext::Browser {
            origin: "https://safemom-git-fix.vercel.app".into(),
        };
        assert!(is_preview_deployment(&preview, empty));
    }

    #[test]
    fn server_preview_detection_reads_env() {
        assert!(is_preview_deployment(&ExecutionContext::Server, public_and_preview));
        assert!(!is_preview_deployment(&ExecutionContext::Server, empty));
    }

    #[test]
    fn join_handles_trailing_slash() {
        assert_eq!(join_url("http://x/", "/api/ping"), "http://x/api/ping");
    }
}
