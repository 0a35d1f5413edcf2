//! HTML pages a misconfigured deployment serves instead of JSON.

use safemom_core::TransportResponse;

/// Framework error page for an uncaught exception in a route handler.
#[must_use]
pub fn server_error_page() -> TransportResponse {
    TransportResponse::html(
        500,
        "<!DOCTYPE html><html><head><title>500: Internal Server Error</title></head>\
         <body><div id=\"__next\"><h1>500</h1><p>Application error: a server-side exception has occurred</p></div>\
         <pre>TypeError: Cannot read properties of undefined (reading 'content')</pre></body></html>",
    )
}

/// Framework not-found page for a missing route.
#[must_use]
pub fn not_found_page() -> TransportResponse {
    TransportResponse::html(
        404,
        "<!DOCTYPE html><html><head><title>404: This page could not be found</title></head>\
         <body><h1>404</h1><h2>This page could not be found.</h2>\
         <script id=\"__NEXT_DATA__\">{\"err\":\"NEXT_NOT_FOUND\"}</script></body></html>",
    )
}

/// Edge network gateway timeout page.
#[must_use]
pub fn gateway_timeout_page() -> TransportResponse {
    TransportResponse::html(
        504,
        "<html><head><title>504: GATEWAY_TIMEOUT</title></head>\
         <body><pre>An error occurred with this application. FUNCTION_INVOCATION_TIMEOUT</pre></body></html>",
    )
}

/// Login page reached by following an auth redirect.
#[must_use]
pub fn login_redirect_page() -> TransportResponse {
    let mut resp = TransportResponse::html(
        200,
        "<html><head><title>Log in</title></head><body><form action=\"/signin\"></form></body></html>",
    );
    resp.redirected = true;
    resp
}
