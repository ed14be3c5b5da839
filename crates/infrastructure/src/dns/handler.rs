//! Bridges [`RootServer`] into `hickory_server::server::RequestHandler`.

use std::sync::Arc;

use async_trait::async_trait;
use hickory_proto::op::{Header, Message, ResponseCode};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use tracing::{error, info};

use rootward_application::services::RootServer;

pub struct RootDnsHandler {
    root_server: Arc<RootServer>,
}

impl RootDnsHandler {
    pub fn new(root_server: Arc<RootServer>) -> Self {
        Self { root_server }
    }

    /// Rebuilds the minimal [`Message`] `RootServer::resolve` needs from the
    /// parsed `Request` (just the header and the first question).
    fn request_to_message(request: &Request) -> Message {
        let mut message = Message::new();
        *message.header_mut() = *request.header();
        for query in request.queries() {
            message.add_query(query.original().clone());
        }
        message
    }

    async fn respond<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> std::io::Result<ResponseInfo> {
        info!(
            src = %request.src(),
            op_code = ?request.op_code(),
            "handling dns request"
        );

        let query_message = Self::request_to_message(request);
        let resolved = self.root_server.resolve(&query_message).await;

        let builder = MessageResponseBuilder::from_message_request(request);
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        header.set_response_code(resolved.header().response_code());

        let response = builder.build(
            header,
            resolved.answers().iter(),
            resolved.name_servers().iter(),
            &[],
            resolved.additionals().iter(),
        );
        response_handle.send_response(response).await
    }
}

#[async_trait]
impl RequestHandler for RootDnsHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        match self.respond(request, response_handle).await {
            Ok(info) => info,
            Err(err) => {
                error!(error = %err, "failed to send dns response");
                let mut header = Header::response_from_request(request.header());
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}
