use std::time::Duration;

use dioxus::prelude::*;

use quiz_core::model::{Topic, topic_label};
use quiz_core::resume::{ACCEPT_ATTRIBUTE, ResumeFile};
use services::{Persist, QuizCommand};

use crate::context::AppContext;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{
    DetailVm, OptionVm, QuestionCardVm, QuizVm, ResultsVm, ResumeUpload, Screen, TopicChipVm,
    map_topic_chips, question_timer_label, selection_placeholder, session_timer_label,
};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK: Duration = Duration::from_secs(1);

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let using_fallback = ctx.using_fallback_bank();
    let topics = use_hook(|| quiz_loop.topics_available());
    let vm = use_signal(|| None::<QuizVm>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut vm = vm;
        async move {
            let run = quiz_loop.restore().await.unwrap_or_default();
            vm.set(Some(QuizVm::new(run)));
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |command: QuizCommand| {
            let mut vm = vm;
            let persist = match vm.write().as_mut() {
                Some(current) => current.apply(&quiz_loop, command),
                None => return,
            };
            if persist != Persist::Nothing {
                let quiz_loop = quiz_loop.clone();
                spawn(async move {
                    quiz_loop.persist(persist).await;
                });
            }
        })
    };

    let choose_resume = use_callback(move |file: ResumeFile| {
        let mut vm = vm;
        if let Some(current) = vm.write().as_mut() {
            current.choose_resume(&file);
        }
    });

    use_future(move || async move {
        loop {
            tokio::time::sleep(TICK).await;
            let running = vm.peek().as_ref().is_some_and(QuizVm::clocks_running);
            if running {
                dispatch.call(QuizCommand::Tick);
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, choose_resume, vm);
            }
        }
    }

    let current = vm.read().as_ref().cloned();
    let body = match (state, current) {
        (ViewState::Ready(()), Some(current)) => rsx! {
            QuizScreen {
                vm: current,
                topics: topics.clone(),
                using_fallback,
                on_command: dispatch,
                on_resume: choose_resume,
            }
        },
        (ViewState::Idle, _) => rsx! {
            p { "Idle" }
        },
        _ => rsx! {
            p { class: "quiz__loading", "Loading..." }
        },
    };

    rsx! {
        div { class: "page quiz", {body} }
    }
}

#[component]
fn QuizScreen(
    vm: QuizVm,
    topics: Vec<(&'static Topic, bool)>,
    using_fallback: bool,
    on_command: EventHandler<QuizCommand>,
    on_resume: EventHandler<ResumeFile>,
) -> Element {
    let run = vm.run();
    let selected = run.session.selected();
    let languages: Vec<String> = selected
        .iter()
        .map(|id| topic_label(id).to_string())
        .collect();
    let session_label = session_timer_label(&run.session_clock);
    let question_label = question_timer_label(&run.question_clock, run.mode());

    match vm.screen() {
        Screen::Landing => rsx! {
            Landing {
                chips: map_topic_chips(&topics, selected),
                placeholder: selection_placeholder(selected),
                can_start: vm.can_start(),
                using_fallback,
                on_command,
            }
        },
        Screen::Question => {
            let Some(card) = QuestionCardVm::from_run(run) else {
                return rsx! {};
            };
            rsx! {
                QuizMeta {
                    languages,
                    total: run.session.len(),
                    session_label,
                    question_label,
                }
                QuestionCard { card, on_command }
            }
        }
        Screen::Results => {
            let Some(results) = ResultsVm::from_run(run) else {
                return rsx! {};
            };
            rsx! {
                QuizMeta {
                    languages,
                    total: run.session.len(),
                    session_label,
                    question_label,
                }
                ResultsPanel {
                    results,
                    resume: vm.resume().clone(),
                    on_command,
                    on_resume,
                }
            }
        }
    }
}

//
// ─── LANDING ───────────────────────────────────────────────────────────────────
//

#[component]
fn Landing(
    chips: Vec<TopicChipVm>,
    placeholder: String,
    can_start: bool,
    using_fallback: bool,
    on_command: EventHandler<QuizCommand>,
) -> Element {
    let selected: Vec<TopicChipVm> = chips.iter().filter(|chip| chip.selected).cloned().collect();

    rsx! {
        section { class: "landing",
            h2 { "Choose languages" }
            if using_fallback {
                p { class: "landing__note",
                    "Question file unavailable, using the built-in questions."
                }
            }
            div { class: "ms", id: "multiSelect",
                div { class: "ms__placeholder", "{placeholder}" }
                div { class: "ms__chips",
                    for chip in selected {
                        SelectedChip { key: "{chip.label}", chip, on_command }
                    }
                }
                ul { class: "ms__list", role: "listbox",
                    for chip in chips {
                        TopicOption { key: "{chip.label}", chip, on_command }
                    }
                }
            }
            button {
                class: "btn btn-primary",
                id: "startBtn",
                r#type: "button",
                disabled: !can_start,
                onclick: move |_| on_command.call(QuizCommand::Start),
                "Start Quiz"
            }
        }
    }
}

#[component]
fn TopicOption(chip: TopicChipVm, on_command: EventHandler<QuizCommand>) -> Element {
    let id = chip.id.clone();
    let class = if chip.selected {
        "ms__item ms__item--selected"
    } else {
        "ms__item"
    };
    rsx! {
        li { class: "{class}", role: "option",
            label {
                input {
                    r#type: "checkbox",
                    checked: chip.selected,
                    disabled: !chip.available,
                    onchange: move |_| on_command.call(QuizCommand::ToggleTopic(id.clone())),
                }
                span { "{chip.label}" }
            }
        }
    }
}

#[component]
fn SelectedChip(chip: TopicChipVm, on_command: EventHandler<QuizCommand>) -> Element {
    let id = chip.id.clone();
    rsx! {
        div { class: "chip",
            span { "{chip.label}" }
            button {
                r#type: "button",
                aria_label: "Remove {chip.label}",
                onclick: move |_| on_command.call(QuizCommand::ToggleTopic(id.clone())),
                "×"
            }
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[component]
fn QuizMeta(
    languages: Vec<String>,
    total: usize,
    session_label: Option<String>,
    question_label: Option<String>,
) -> Element {
    rsx! {
        div { class: "quiz-meta",
            div { class: "quiz-meta__langs",
                "Languages: "
                for language in languages {
                    span { key: "{language}", class: "lang-pill", "{language}" }
                }
            }
            span { class: "quiz-meta__total", "{total} questions" }
            div { class: "timers",
                if let Some(label) = session_label {
                    span { class: "timer", id: "timer", "{label}" }
                }
                if let Some(label) = question_label {
                    span { class: "timer timer--question", id: "qTimer", "{label}" }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(card: QuestionCardVm, on_command: EventHandler<QuizCommand>) -> Element {
    let read_only = card.read_only;
    let options = card.options.clone();

    rsx! {
        div { class: "q-card",
            div { class: "q-head",
                div { class: "q-head__lang",
                    "Language: "
                    strong { "{card.topic_label}" }
                }
                div { class: "q-head__counter", "{card.counter}" }
            }
            div { class: "q-text", "{card.text}" }
            div { class: "options", role: "radiogroup",
                for option in options {
                    OptionRow { key: "{option.input_id}", option, read_only, on_command }
                }
            }
            div { class: "controls",
                button {
                    class: "btn btn-ghost",
                    id: "backBtn",
                    r#type: "button",
                    disabled: card.back_disabled,
                    onclick: move |_| on_command.call(QuizCommand::Back),
                    "Back"
                }
                button {
                    class: "btn btn-ghost",
                    id: "clearBtn",
                    r#type: "button",
                    disabled: card.clear_disabled,
                    onclick: move |_| on_command.call(QuizCommand::Clear),
                    "Clear"
                }
                div { class: "spacer" }
                div { class: "progress",
                    i { style: "width: {card.progress_percent}%" }
                }
                button {
                    class: "btn btn-primary",
                    id: "nextBtn",
                    r#type: "button",
                    onclick: move |_| on_command.call(QuizCommand::Next),
                    "{card.next_label}"
                }
            }
        }
    }
}

#[component]
fn OptionRow(option: OptionVm, read_only: bool, on_command: EventHandler<QuizCommand>) -> Element {
    let index = option.index;
    rsx! {
        label {
            class: "opt",
            tabindex: "0",
            onkeydown: move |evt: KeyboardEvent| {
                let commands = option_key_commands(&evt.data.key(), index, read_only);
                if commands.is_empty() {
                    return;
                }
                evt.prevent_default();
                for command in commands {
                    on_command.call(command);
                }
            },
            input {
                r#type: "radio",
                name: "choice",
                id: "{option.input_id}",
                value: "{index}",
                checked: option.checked,
                disabled: read_only,
                onchange: move |_| on_command.call(QuizCommand::Choose(index)),
            }
            span { class: "opt__text", "{option.text}" }
        }
    }
}

/// Enter on an answer option picks it and moves on. Nothing in review.
pub(crate) fn option_key_commands(key: &Key, index: usize, read_only: bool) -> Vec<QuizCommand> {
    if read_only || *key != Key::Enter {
        return Vec::new();
    }
    vec![QuizCommand::Choose(index), QuizCommand::Next]
}

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

#[component]
fn ResultsPanel(
    results: ResultsVm,
    resume: ResumeUpload,
    on_command: EventHandler<QuizCommand>,
    on_resume: EventHandler<ResumeFile>,
) -> Element {
    let submitted = matches!(resume, ResumeUpload::Accepted(_));
    let submit_label = if submitted {
        "Resume submitted ✓"
    } else {
        "Submit Resume"
    };
    let resume_message = match &resume {
        ResumeUpload::Waiting => None,
        ResumeUpload::Rejected(err) => Some(("resume__error", err.to_string())),
        ResumeUpload::Accepted(accepted) => Some(("resume__confirmation", accepted.confirmation())),
    };
    let details = results.details.clone();

    rsx! {
        div { class: "result",
            h3 { "Results" }
            div { class: "result__top",
                div { class: "result__score",
                    "{results.score_label}"
                    span { class: "result__percent", "{results.percent_label}" }
                }
                div { class: "result__time", "{results.time_label}" }
                div { class: "result__actions",
                    button {
                        class: "btn btn-ghost",
                        id: "reviewBtn",
                        r#type: "button",
                        onclick: move |_| on_command.call(QuizCommand::Review),
                        "Review Answers"
                    }
                    button {
                        class: "btn btn-primary",
                        id: "restartBtn",
                        r#type: "button",
                        onclick: move |_| on_command.call(QuizCommand::Restart),
                        "Restart"
                    }
                }
            }
            if results.passed {
                div { class: "pass-banner", "{results.banner}" }
                div { class: "resume",
                    label { class: "btn btn-primary resume__pick",
                        "{submit_label}"
                        input {
                            r#type: "file",
                            id: "resumeInput",
                            accept: ACCEPT_ATTRIBUTE,
                            disabled: submitted,
                            hidden: true,
                            onchange: move |evt: FormEvent| {
                                if let Some(file) = picked_resume(&evt) {
                                    on_resume.call(file);
                                }
                            },
                        }
                    }
                    span { class: "resume__note",
                        "Upload your resume (PDF, DOC or DOCX) to proceed."
                    }
                    if let Some((class, text)) = resume_message {
                        div { class: "{class}", "{text}" }
                    }
                }
            } else {
                div { class: "fail-banner", "{results.banner}" }
                p { class: "result__hint", "Review the questions and try a future round." }
            }
            p { class: "result__hint", "Scroll to see per-question feedback." }
        }
        div { class: "details",
            for detail in details {
                DetailItem { key: "{detail.heading}", detail }
            }
        }
    }
}

#[component]
fn DetailItem(detail: DetailVm) -> Element {
    let options = detail.options.clone();
    rsx! {
        div { class: "detail",
            div { class: "detail__title", "{detail.heading}" }
            div { class: "detail__options",
                for (index, option) in options.into_iter().enumerate() {
                    div { key: "{index}", class: "detail__option",
                        span { class: "{option.class}", "{option.text}" }
                        "{option.note}"
                    }
                }
            }
        }
    }
}

/// First file of a picker change event, if any.
fn picked_resume(evt: &FormEvent) -> Option<ResumeFile> {
    let file = evt.files().into_iter().next()?;
    Some(ResumeFile {
        name: file.name(),
        size_bytes: file.size(),
        mime: file.content_type(),
    })
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizCommand>>>>,
    choose_resume: Rc<RefCell<Option<Callback<ResumeFile>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(
        &self,
        dispatch: Callback<QuizCommand>,
        choose_resume: Callback<ResumeFile>,
        vm: Signal<Option<QuizVm>>,
    ) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.choose_resume.borrow_mut() = Some(choose_resume);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizCommand> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn choose_resume(&self) -> Callback<ResumeFile> {
        (*self.choose_resume.borrow()).expect("resume callback registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
