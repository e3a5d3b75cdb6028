use std::sync::Arc;

use dioxus::prelude::*;

use services::{RoundBuilder, RoundRequest, StudySession};

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{
    ActionVm, BodyVm, CardVm, FaceLineVm, Intent, OptionVm, QuestionVm, SummaryTilesVm,
    screen_vm,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// The whole study flow: one session, rendered from its snapshot.
#[component]
pub fn StudyView() -> Element {
    let ctx = use_context::<AppContext>();
    let builder = ctx.round_builder();
    let entries = ctx.entries();

    let session = use_signal({
        let builder = Arc::clone(&builder);
        move || StudySession::new(builder)
    });
    let error = use_signal(|| None::<ViewError>);

    let loader = use_resource(move || {
        let entries = Arc::clone(&entries);
        let mut session = session;
        async move {
            let result = entries.load_entries().await;
            if let Err(err) = session.write().finish_loading(result) {
                tracing::debug!(error = %err, "ignoring late load result");
            }
        }
    });

    let dispatch = use_callback(move |intent: Intent| {
        let mut session = session;
        let mut error = error;
        let mut loader = loader;

        let outcome = match intent {
            Intent::Reload => {
                session.set(StudySession::new(Arc::clone(&builder)));
                loader.restart();
                Ok(())
            }
            Intent::SelectLevel(level) => session.write().select_level(level),
            Intent::Start => {
                let requested = session.write().begin_start();
                requested.map(|request| spawn_round(request, Arc::clone(&builder), session, error))
            }
            Intent::RetryFailed => {
                let requested = session.write().begin_retry_failed();
                requested.map(|request| spawn_round(request, Arc::clone(&builder), session, error))
            }
            Intent::Back => session.write().back(),
            Intent::SelectName(name) => session.write().select_name(name),
            Intent::SelectType(nerve_type) => session.write().select_type(nerve_type),
            Intent::Submit => session.write().submit_answer().map(|_| ()),
            Intent::Flip => session.write().flip_card(),
            Intent::Score { is_correct } => session.write().score_card(is_correct),
            Intent::NextLevel => session.write().advance_next(),
            Intent::Restart => session.write().restart(),
        };

        match outcome {
            Ok(()) => error.set(None),
            Err(err) => {
                tracing::debug!(error = %err, "intent rejected");
                error.set(Some(ViewError::from(&err)));
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<StudyTestHandles>() {
                handles.register(dispatch);
            }
        }
    }

    let screen = screen_vm(&session.read().snapshot());
    let flip_hint = match &screen.body {
        BodyVm::Card(card) => card.hint,
        _ => None,
    };
    let banner = *error.read();

    rsx! {
        div { class: "app_shell",
            div { class: "panel",
                div { class: "fade_in",
                    ScreenHeader {
                        badge: screen.badge.clone(),
                        title: screen.title.clone(),
                        subtitle: screen.subtitle.clone(),
                    }
                    match screen.body.clone() {
                        BodyVm::Empty => rsx! {},
                        BodyVm::Question(question) => rsx! {
                            QuestionPanel { question, on_intent: dispatch }
                        },
                        BodyVm::Card(card) => rsx! {
                            FlashCard { card, on_intent: dispatch }
                        },
                        BodyVm::Summary(tiles) => rsx! {
                            SummaryTiles { tiles }
                        },
                    }
                    if !screen.actions.is_empty() {
                        ActionRow { actions: screen.actions.clone(), on_intent: dispatch }
                    }
                    if let Some(hint) = flip_hint {
                        p { class: "flip_hint", "{hint}" }
                    }
                    if let Some(level) = screen.building {
                        p { class: "status_note", "Preparing {level}..." }
                    }
                    if let Some(err) = banner {
                        p { class: "error_note", role: "alert", "{err.message()}" }
                    }
                }
            }
        }
    }
}

/// Run a round build off the event handler and feed the result back.
fn spawn_round(
    request: RoundRequest,
    builder: Arc<dyn RoundBuilder>,
    mut session: Signal<StudySession>,
    mut error: Signal<Option<ViewError>>,
) {
    spawn(async move {
        let result = request.run(builder.as_ref()).await;
        let applied = session.write().complete_round(request.ticket(), result);
        match applied {
            Ok(outcome) => tracing::debug!(?outcome, level = %request.level(), "round build finished"),
            Err(err) => {
                tracing::warn!(error = %err, "round build rejected");
                error.set(Some(ViewError::from(&err)));
            }
        }
    });
}

#[component]
fn ScreenHeader(badge: Option<String>, title: String, subtitle: String) -> Element {
    rsx! {
        div { class: "header",
            if let Some(badge) = badge {
                div { class: "level_badge", "{badge}" }
            }
            h1 { class: "title", "{title}" }
            p { class: "subtitle", "{subtitle}" }
        }
    }
}

#[component]
fn QuestionPanel(question: QuestionVm, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "card",
            div { class: "counter", "{question.counter}" }
            p { class: "card_prompt", "{question.prompt}" }
            OptionGrid { options: question.name_options.clone(), on_intent }
            OptionGrid { options: question.type_options.clone(), on_intent }
        }
    }
}

#[component]
fn OptionGrid(options: Vec<OptionVm>, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "section",
            div { class: "option_grid",
                for option in options.iter() {
                    OptionButton { key: "{option.label}", option: option.clone(), on_intent }
                }
            }
        }
    }
}

#[component]
fn OptionButton(option: OptionVm, on_intent: EventHandler<Intent>) -> Element {
    let class = if option.selected {
        "option_button option_button--selected"
    } else {
        "option_button"
    };
    let intent = option.intent.clone();
    rsx! {
        button {
            class: "{class}",
            r#type: "button",
            onclick: move |_| on_intent.call(intent.clone()),
            "{option.label}"
        }
    }
}

#[component]
fn FlashCard(card: CardVm, on_intent: EventHandler<Intent>) -> Element {
    let class = if card.revealed {
        "deck_card deck_card--flipped"
    } else {
        "deck_card"
    };
    rsx! {
        div { class: "flashcard_host",
            div { class: "flashcard_meta", "{card.counter}" }
            button {
                class: "{class}",
                r#type: "button",
                aria_pressed: "{card.revealed}",
                onclick: move |_| on_intent.call(Intent::Flip),
                div { class: "deck_face",
                    for (index, line) in card.visible_face().iter().enumerate() {
                        FaceLine { key: "{index}", line: line.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn FaceLine(line: FaceLineVm) -> Element {
    let value_class = if line.headline { "deck_title" } else { "deck_value" };
    rsx! {
        if let Some(label) = line.label {
            div { class: "deck_label", "{label}" }
        }
        div { class: "{value_class}", "{line.value}" }
    }
}

#[component]
fn SummaryTiles(tiles: SummaryTilesVm) -> Element {
    rsx! {
        div { class: "summary_grid",
            SummaryTile { value: tiles.correct, label: "Correct" }
            SummaryTile { value: tiles.wrong, label: "Wrong" }
            SummaryTile { value: tiles.total, label: "Total" }
        }
    }
}

#[component]
fn SummaryTile(value: usize, label: &'static str) -> Element {
    rsx! {
        div { class: "summary_tile",
            strong { "{value}" }
            div { "{label}" }
        }
    }
}

#[component]
fn ActionRow(actions: Vec<ActionVm>, on_intent: EventHandler<Intent>) -> Element {
    rsx! {
        div { class: "button_row section",
            for action in actions.iter() {
                ActionButton { key: "{action.label}", action: action.clone(), on_intent }
            }
        }
    }
}

#[component]
fn ActionButton(action: ActionVm, on_intent: EventHandler<Intent>) -> Element {
    let intent = action.intent.clone();
    rsx! {
        button {
            class: "{action.style.class()}",
            r#type: "button",
            disabled: !action.enabled,
            onclick: move |_| on_intent.call(intent.clone()),
            "{action.label}"
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct StudyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<Intent>>>>,
}

#[cfg(test)]
impl StudyTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<Intent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<Intent> {
        (*self.dispatch.borrow()).expect("study dispatch registered")
    }
}
