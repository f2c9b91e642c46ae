use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RepairError;
use crate::masking::MaskingSession;

pub const QUEUED_NOTICE: &str = "SURGERY COMMAND QUEUED TO CLOUD RUN...";

/// Mask plus prompt, as handed to the repair service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepairRequest {
    pub node_id: String,
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    /// Base64-encoded PNG of the mask surface.
    pub mask_png: String,
}

impl RepairRequest {
    pub fn from_session(
        node_id: &str,
        prompt: &str,
        session: &MaskingSession,
    ) -> Result<Self, RepairError> {
        let png = session.export_png()?;
        let (width, height) = session.surface().size();
        Ok(Self {
            node_id: node_id.to_string(),
            prompt: prompt.trim().to_string(),
            width,
            height,
            mask_png: STANDARD.encode(png),
        })
    }

    pub fn to_json(&self) -> Result<String, RepairError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobAck {
    pub job_id: String,
    pub target: &'static str,
}

pub trait RepairDispatcher {
    fn dispatch(&self, request: RepairRequest) -> Result<JobAck, RepairError>;
}

/// Stand-in for the cloud service: serializes the request, logs it and
/// acknowledges without sending anything.
#[derive(Debug, Default)]
pub struct CloudStub {
    submitted: std::cell::Cell<u64>,
}

impl CloudStub {
    pub fn submitted(&self) -> u64 {
        self.submitted.get()
    }
}

impl RepairDispatcher for CloudStub {
    fn dispatch(&self, request: RepairRequest) -> Result<JobAck, RepairError> {
        let payload = request.to_json()?;
        let n = self.submitted.get() + 1;
        self.submitted.set(n);
        info!(
            node = %request.node_id,
            prompt = %request.prompt,
            width = request.width,
            height = request.height,
            bytes = payload.len(),
            "repair job queued"
        );
        Ok(JobAck {
            job_id: format!("repair-{}-{n}", request.node_id),
            target: "cloud",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushConfig;
    use crate::masking::MASK_COLOR;

    fn painted_session() -> MaskingSession {
        let mut s = MaskingSession::new(40, 30, BrushConfig::new(8), MASK_COLOR);
        s.enter();
        s.begin_stroke((5.0, 5.0));
        s.extend_stroke((30.0, 20.0));
        s.end_stroke();
        s
    }

    #[test]
    fn request_carries_decodable_mask() {
        let session = painted_session();
        let req = RepairRequest::from_session("n7", "  fix eye details ", &session)
            .expect("request");
        assert_eq!(req.prompt, "fix eye details");
        assert_eq!((req.width, req.height), (40, 30));

        let png = STANDARD.decode(&req.mask_png).expect("base64");
        let decoded = image::load_from_memory(&png).expect("png").to_rgba8();
        assert_eq!(decoded.as_raw(), session.surface().rgba_pixels());
    }

    #[test]
    fn request_serializes_to_json() {
        let req = RepairRequest::from_session("n7", "remove reflections", &painted_session())
            .expect("request");
        let json = req.to_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["node_id"], "n7");
        assert_eq!(value["prompt"], "remove reflections");
        assert_eq!(value["width"], 40);
        assert!(value["mask_png"].as_str().is_some_and(|s| !s.is_empty()));

        let back: RepairRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, req);
    }

    #[test]
    fn stub_acknowledges_each_job() {
        let stub = CloudStub::default();
        let req = RepairRequest::from_session("n1", "", &painted_session()).expect("request");
        let first = stub.dispatch(req.clone()).expect("ack");
        let second = stub.dispatch(req).expect("ack");
        assert_eq!(first.target, "cloud");
        assert_eq!(first.job_id, "repair-n1-1");
        assert_eq!(second.job_id, "repair-n1-2");
        assert_eq!(stub.submitted(), 2);
    }
}
