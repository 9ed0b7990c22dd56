/// Transaction example grouping.
///
/// Requests and responses appearing in sequence under an action pair up
/// into transaction examples: a request arriving after a response closes
/// the current example and opens the next one. Declaration order is kept
/// within an example. Stray code blocks between payloads ("dangling
/// assets") append to the most recent payload's body.

use crate::ast::{Payload, TransactionExample};
use crate::sourcemap::{ExampleSourceMap, PayloadSourceMap};
use crate::text;

#[derive(Debug, Clone, Copy)]
enum LastPayload {
    Request,
    Response,
}

#[derive(Debug, Default)]
pub(crate) struct ExampleBuilder {
    examples: Vec<TransactionExample>,
    maps: Vec<ExampleSourceMap>,
    current: TransactionExample,
    current_map: ExampleSourceMap,
    started: bool,
    last: Option<LastPayload>,
}

impl ExampleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&mut self, payload: Payload, map: PayloadSourceMap) {
        // A request after a response starts the next request/response pair.
        if !self.current.responses.is_empty() {
            self.roll_over();
        }
        self.current.requests.push(payload);
        self.current_map.requests.push(map);
        self.started = true;
        self.last = Some(LastPayload::Request);
    }

    pub fn add_response(&mut self, payload: Payload, map: PayloadSourceMap) {
        self.current.responses.push(payload);
        self.current_map.responses.push(map);
        self.started = true;
        self.last = Some(LastPayload::Response);
    }

    /// Append a dangling asset to the most recent payload. Returns false
    /// when no payload was seen yet.
    pub fn append_dangling(&mut self, content: &str) -> bool {
        let target = match self.last {
            Some(LastPayload::Request) => self.current.requests.last_mut(),
            Some(LastPayload::Response) => self.current.responses.last_mut(),
            None => None,
        };
        match target {
            Some(payload) => {
                payload.body.push_str(&text::recovered_asset(content));
                true
            }
            None => false,
        }
    }

    /// True when no payload of the whole action carried a response.
    pub fn has_no_responses(&self) -> bool {
        self.current.responses.is_empty() && self.examples.iter().all(|e| e.responses.is_empty())
    }

    pub fn finish(mut self) -> (Vec<TransactionExample>, Vec<ExampleSourceMap>) {
        if self.started {
            self.examples.push(self.current);
            self.maps.push(self.current_map);
        }
        (self.examples, self.maps)
    }

    fn roll_over(&mut self) {
        self.examples.push(std::mem::take(&mut self.current));
        self.maps.push(std::mem::take(&mut self.current_map));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_after_response_starts_new_example() {
        let mut builder = ExampleBuilder::new();
        builder.add_request(Payload::default(), PayloadSourceMap::default());
        builder.add_response(Payload::default(), PayloadSourceMap::default());
        builder.add_request(Payload::default(), PayloadSourceMap::default());
        builder.add_response(Payload::default(), PayloadSourceMap::default());

        let (examples, _) = builder.finish();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].requests.len(), 1);
        assert_eq!(examples[0].responses.len(), 1);
        assert_eq!(examples[1].requests.len(), 1);
    }

    #[test]
    fn dangling_asset_reaches_last_payload() {
        let mut builder = ExampleBuilder::new();
        builder.add_request(Payload::default(), PayloadSourceMap::default());
        assert!(builder.append_dangling("dangling request body\n"));

        let (examples, _) = builder.finish();
        assert_eq!(examples[0].requests[0].body, "dangling request body\n\n");
    }
}
