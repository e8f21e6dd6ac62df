pub mod build_request_body;
pub mod parse_response_body;
