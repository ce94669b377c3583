use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Notifications published by a load session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LoaderEvent {
    /// Fraction of the root's fragments received so far, in `[0, 1]`.
    #[serde(rename = "load-progress")]
    Progress { progress: f64, id: String },
    /// A non-fatal condition worth surfacing to the user.
    #[serde(rename = "load-warning")]
    Warning { message: String },
}

/// A broadcast channel receiver for loader events.
pub type EventStream = broadcast::Receiver<LoaderEvent>;

/// Publish `event`. Having no subscribers is not an error.
pub(crate) fn publish(sender: &broadcast::Sender<LoaderEvent>, event: LoaderEvent) {
    let _ = sender.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_event_names() {
        let progress = LoaderEvent::Progress { progress: 0.5, id: "u".into() };
        assert_eq!(
            serde_json::to_value(&progress).unwrap(),
            json!({"event": "load-progress", "progress": 0.5, "id": "u"})
        );
        let warning = LoaderEvent::Warning { message: "empty".into() };
        assert_eq!(
            serde_json::to_value(&warning).unwrap(),
            json!({"event": "load-warning", "message": "empty"})
        );
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        publish(&tx, LoaderEvent::Warning { message: "nobody".into() });
    }
}
