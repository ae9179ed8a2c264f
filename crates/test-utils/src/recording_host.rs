use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use assetcopy::engine::{BuildCycle, CycleHost, CycleReport};
use assetcopy::errors::Result;

/// A host that keeps every settled cycle in memory instead of writing it.
///
/// `prefill` is inserted into each fresh cycle, standing in for assets other
/// parts of a build registered before the copy engine runs.
pub struct RecordingHost {
    context: String,
    output: String,
    prefill: Vec<(String, Vec<u8>)>,
    settled: Arc<Mutex<Vec<(BuildCycle, CycleReport)>>>,
}

impl RecordingHost {
    pub fn new(
        context: &str,
        output: &str,
        settled: Arc<Mutex<Vec<(BuildCycle, CycleReport)>>>,
    ) -> Self {
        Self {
            context: context.to_string(),
            output: output.to_string(),
            prefill: Vec::new(),
            settled,
        }
    }

    pub fn with_existing_asset(mut self, key: &str, content: &[u8]) -> Self {
        self.prefill.push((key.to_string(), content.to_vec()));
        self
    }
}

impl CycleHost for RecordingHost {
    fn begin_cycle(&mut self) -> BuildCycle {
        let mut cycle = BuildCycle::new(&self.context, &self.output);
        for (key, content) in &self.prefill {
            cycle
                .assets
                .insert(key.clone(), assetcopy::engine::Asset::from_bytes(content.clone()));
        }
        cycle
    }

    fn emit<'a>(
        &'a mut self,
        cycle: &'a mut BuildCycle,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            // Hosts commonly rebuild dependency lists while emitting.
            cycle.file_dependencies.clear();
            cycle.context_dependencies.clear();
            Ok(())
        })
    }

    fn finish_cycle(&mut self, cycle: BuildCycle, report: CycleReport) {
        let mut guard = self.settled.lock().unwrap();
        guard.push((cycle, report));
    }
}
