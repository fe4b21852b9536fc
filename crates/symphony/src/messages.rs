//! Message and attachment operations.

use base64::Engine;
use reqwest::multipart::{Form, Part};

use crate::client::{Host, HttpClient};
use crate::error::Result;
use crate::types::*;

/// Client for sending and reading messages.
#[derive(Clone)]
pub struct MessagesClient {
    client: HttpClient,
}

impl MessagesClient {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Send a message, with optional entity data and attachments, to a stream.
    pub async fn send_message(
        &self,
        stream_id: &str,
        message: &OutboundMessage,
    ) -> Result<SymMessage> {
        self.client
            .post_multipart(
                Host::Agent,
                &format!(
                    "/agent/v4/stream/{}/message/create",
                    urlencoding::encode(stream_id)
                ),
                || build_message_form(message),
            )
            .await
    }

    /// Read messages of a stream created at or after `since_ms`.
    pub async fn get_messages(
        &self,
        stream_id: &str,
        since_ms: i64,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<SymMessage>> {
        let mut query_params: Vec<(String, String)> =
            vec![("since".to_string(), since_ms.to_string())];
        if let Some(skip) = skip {
            query_params.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = limit {
            query_params.push(("limit".to_string(), limit.to_string()));
        }

        let query: Vec<(&str, &str)> = query_params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let messages: Option<Vec<SymMessage>> = self
            .client
            .get(
                Host::Agent,
                &format!("/agent/v4/stream/{}/message", urlencoding::encode(stream_id)),
                Some(query.as_slice()),
                None,
            )
            .await?;
        Ok(messages.unwrap_or_default())
    }

    /// Download an attachment. The agent returns the content base64 encoded.
    pub async fn get_attachment(
        &self,
        stream_id: &str,
        attachment_id: &str,
        message_id: &str,
    ) -> Result<Vec<u8>> {
        let query = [("fileId", attachment_id), ("messageId", message_id)];
        let encoded = self
            .client
            .get_text(
                Host::Agent,
                &format!("/agent/v1/stream/{}/attachment", urlencoding::encode(stream_id)),
                Some(query.as_slice()),
            )
            .await?;
        decode_attachment(&encoded)
    }

    /// Download every attachment of a message, paired with its metadata.
    pub async fn get_message_attachments(
        &self,
        message: &SymMessage,
    ) -> Result<Vec<(SymAttachmentInfo, Vec<u8>)>> {
        let mut out = Vec::with_capacity(message.attachments.len());
        for info in &message.attachments {
            let content = self
                .get_attachment(message.stream_id(), &info.id, &message.message_id)
                .await?;
            out.push((info.clone(), content));
        }
        Ok(out)
    }

    /// Get read / delivery status of a message.
    pub async fn get_message_status(&self, message_id: &str) -> Result<SymMessageStatus> {
        self.client
            .get(
                Host::Pod,
                &format!("/pod/v1/message/{}/status", urlencoding::encode(message_id)),
                None,
                None,
            )
            .await
    }

    /// Search messages.
    pub async fn search_messages(
        &self,
        query: &MessageSearchQuery,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<SymMessage>> {
        let skip = skip.to_string();
        let limit = limit.to_string();
        let params = [("skip", skip.as_str()), ("limit", limit.as_str())];
        let messages: Option<Vec<SymMessage>> = self
            .client
            .post(Host::Agent, "/agent/v1/message/search", Some(query), Some(params.as_slice()))
            .await?;
        Ok(messages.unwrap_or_default())
    }
}

fn build_message_form(message: &OutboundMessage) -> Result<Form> {
    let mut form = Form::new().text("message", message.message.clone());
    if let Some(data) = &message.data {
        form = form.text("data", data.clone());
    }
    for attachment in &message.attachments {
        let mut part =
            Part::bytes(attachment.content.clone()).file_name(attachment.file_name.clone());
        if let Some(mime) = &attachment.mime_type {
            part = part.mime_str(mime)?;
        }
        form = form.part("attachment", part);
    }
    Ok(form)
}

/// Decode a base64 attachment body, tolerating embedded line breaks.
pub(crate) fn decode_attachment(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}
