use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{RoundBuilder, ShuffledRoundBuilder};
use storage::repository::EntryRepository;

use crate::context::{UiApp, build_app_context};
use crate::views::StudyView;
use crate::views::study::StudyTestHandles;
use crate::vm::Intent;

struct TestApp {
    entries: Arc<dyn EntryRepository>,
    round_builder: Arc<dyn RoundBuilder>,
}

impl UiApp for TestApp {
    fn entries(&self) -> Arc<dyn EntryRepository> {
        Arc::clone(&self.entries)
    }

    fn round_builder(&self) -> Arc<dyn RoundBuilder> {
        Arc::clone(&self.round_builder)
    }
}

#[derive(Props, Clone)]
struct StudyHarnessProps {
    app: Arc<TestApp>,
    handles: StudyTestHandles,
}

impl PartialEq for StudyHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn StudyHarnessRoot(props: StudyHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { StudyView {} }
}

pub struct StudyHarness {
    pub dom: VirtualDom,
    pub handles: StudyTestHandles,
}

impl StudyHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    /// Let spawned tasks (entry loading, round builds) run, then re-render.
    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn dispatch(&mut self, intent: Intent) {
        self.handles.dispatch().call(intent);
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Mount the study screen over `entries`, loaded and ready for intents.
pub async fn setup_study_harness(entries: Arc<dyn EntryRepository>) -> StudyHarness {
    let handles = StudyTestHandles::default();
    let app = Arc::new(TestApp {
        entries,
        round_builder: Arc::new(ShuffledRoundBuilder::with_seed(11)),
    });

    let dom = VirtualDom::new_with_props(
        StudyHarnessRoot,
        StudyHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    let mut harness = StudyHarness { dom, handles };
    harness.rebuild();
    harness.drive_async().await;
    harness
}
