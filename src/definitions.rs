//! The HTTP error kinds.
//!
//! Each line declares one zero-sized kind type, one [`HttpErrorKind`]
//! variant and one row of [`HTTP_ERRORS`]. Rows are in status order and
//! variant order must match row order; `catalog` tests check both.
//!
//! # Client-caused (4xx)
//!
//! Malformed input, missing resources, authorization failures, conflicts,
//! failed preconditions and rate limiting. `499` is the de facto status for a
//! caller that went away before the response was ready, which is also how
//! cancelled tasks are reported.
//!
//! # Server-caused (5xx)
//!
//! Unhandled internal faults, unimplemented paths, upstream failures,
//! unavailability and upstream timeouts. `INTERNAL_SERVER_ERROR` is the
//! normalization default.

crate::convenience::define_http_errors! {
    /// 400: the request is malformed or fails validation.
    BadRequestError / BadRequest => (400, "BAD_REQUEST", "Bad Request"),
    /// 401: credentials are missing or invalid.
    UnauthorizedError / Unauthorized => (401, "UNAUTHORIZED", "Unauthorized"),
    /// 402: payment is required before the request can proceed.
    PaymentRequiredError / PaymentRequired => (402, "PAYMENT_REQUIRED", "Payment Required"),
    /// 403: the caller is known but not allowed.
    ForbiddenError / Forbidden => (403, "FORBIDDEN", "Forbidden"),
    /// 404: the resource does not exist.
    NotFoundError / NotFound => (404, "NOT_FOUND", "Not Found"),
    /// 405: the resource does not support this method.
    MethodNotAllowedError / MethodNotAllowed => (405, "METHOD_NOT_ALLOWED", "Method Not Allowed"),
    /// 408: the client took too long to send the request.
    RequestTimeoutError / RequestTimeout => (408, "REQUEST_TIMEOUT", "Request Timeout"),
    /// 409: the request conflicts with current state.
    ConflictError / Conflict => (409, "CONFLICT", "Conflict"),
    /// 410: the resource existed but is permanently gone.
    GoneError / Gone => (410, "GONE", "Gone"),
    /// 412: a request precondition did not hold.
    PreconditionFailedError / PreconditionFailed => (412, "PRECONDITION_FAILED", "Precondition Failed"),
    /// 413: the request body is too large.
    PayloadTooLargeError / PayloadTooLarge => (413, "PAYLOAD_TOO_LARGE", "Payload Too Large"),
    /// 415: the request body has an unsupported media type.
    UnsupportedMediaTypeError / UnsupportedMediaType => (415, "UNSUPPORTED_MEDIA_TYPE", "Unsupported Media Type"),
    /// 422: the request is well formed but semantically invalid.
    UnprocessableEntityError / UnprocessableEntity => (422, "UNPROCESSABLE_ENTITY", "Unprocessable Entity"),
    /// 429: the caller is rate limited.
    TooManyRequestsError / TooManyRequests => (429, "TOO_MANY_REQUESTS", "Too Many Requests"),
    /// 499: the caller closed the request or the task was cancelled.
    ClientClosedRequestError / ClientClosedRequest => (499, "CLIENT_CLOSED_REQUEST", "Client Closed Request"),
    /// 500: unhandled internal fault.
    InternalServerError / InternalServer => (500, "INTERNAL_SERVER_ERROR", "Internal Server Error"),
    /// 501: the path is not implemented.
    NotImplementedError / NotImplemented => (501, "NOT_IMPLEMENTED", "Not Implemented"),
    /// 502: an upstream dependency answered badly.
    BadGatewayError / BadGateway => (502, "BAD_GATEWAY", "Bad Gateway"),
    /// 503: the service is temporarily unavailable.
    ServiceUnavailableError / ServiceUnavailable => (503, "SERVICE_UNAVAILABLE", "Service Unavailable"),
    /// 504: an upstream dependency timed out.
    GatewayTimeoutError / GatewayTimeout => (504, "GATEWAY_TIMEOUT", "Gateway Timeout"),
}
