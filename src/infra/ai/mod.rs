pub mod http_ai_responder;
