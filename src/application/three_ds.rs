//! 3-D Secure flow control.
//!
//! The handshake spans two client calls. Init asks the processor for the
//! interactive challenge and leaves the session pending; the end user then
//! completes the challenge in their browser, and the processor redirects back
//! with a `paymentId`. Complete turns that callback into a confirm call. No
//! session state is kept between the two calls: the processor rejects unknown
//! or replayed completions, and those rejections travel the normal failure
//! path.

use crate::application::builders::{self, PaymentPayload, ThreeDSAuthPayload};
use crate::application::normalizer::Outcome;
use crate::domain::outcome::{PaymentResult, ThreeDSChallenge};
use crate::domain::payment::{PaymentRequest, ThreeDSCompleteRequest};
use crate::domain::three_ds::ThreeDSSession;
use crate::error::Result;

/// Validates the init request (callback URL included) and builds its payload.
pub fn initiation_payload(req: &PaymentRequest) -> Result<PaymentPayload> {
    req.validate_for_three_ds()?;
    // Forwarded as the client wrote it; the parsed form may be normalized.
    let callback_url = req.callback_url.as_deref().unwrap_or_default();
    Ok(builders::build_three_ds_init(req, callback_url))
}

/// Session entered after the processor accepted the init call.
///
/// The transaction id is the processor's conversation id; when the reply does
/// not echo one, the conversation id we sent (the order id) is used.
pub fn open_session(req: &PaymentRequest, challenge: &ThreeDSChallenge) -> ThreeDSSession {
    let transaction_id = challenge
        .transaction_id
        .clone()
        .unwrap_or_else(|| req.order_id.clone());
    ThreeDSSession::pending(transaction_id, challenge.html_content.clone())
}

/// Validates the completion callback and builds the confirm payload.
pub fn completion_payload(
    req: &ThreeDSCompleteRequest,
) -> Result<(ThreeDSSession, ThreeDSAuthPayload)> {
    req.validate()?;
    let session = ThreeDSSession::awaiting_confirmation(req.transaction_id.clone());
    Ok((session, builders::build_three_ds_complete(req)))
}

pub fn close_session(session: ThreeDSSession, outcome: &Outcome<PaymentResult>) -> ThreeDSSession {
    session.resolve(outcome.clone())
}
