use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::bank::QuestionBank;
use quiz_core::model::{Question, TopicId};
use quiz_core::resume::ResumeFile;
use quiz_core::time::fixed_clock;
use services::{BankOrigin, QuizCommand, QuizLoopService};
use storage::repository::InMemoryRepository;

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::vm::QuizVm;

use super::quiz::QuizTestHandles;

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    bank_origin: BankOrigin,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn bank_origin(&self) -> BankOrigin {
        self.bank_origin
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizRouterHarness(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    rsx! { QuizView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub repo: Arc<InMemoryRepository>,
    pub handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub async fn send(&mut self, command: QuizCommand) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(command));
        drive_dom(&mut self.dom);
        self.drive_async().await;
    }

    pub async fn pick_resume(&mut self, file: ResumeFile) {
        let choose = self.handles.choose_resume();
        self.dom.in_runtime(|| choose.call(file));
        drive_dom(&mut self.dom);
        self.drive_async().await;
    }

    pub fn vm(&self) -> QuizVm {
        let vm = self.handles.vm();
        self.dom
            .in_runtime(|| vm.peek().as_ref().cloned())
            .expect("quiz restored")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Two C++ questions whose correct options are "b" and "d".
pub fn two_cpp_questions() -> QuestionBank {
    let q = |text: &str, answer| {
        Question::new(
            text,
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer,
        )
        .expect("valid question")
    };
    QuestionBank::from_topics([(TopicId::new("cpp"), vec![q("first", 1), q("second", 3)])])
}

pub fn setup_quiz_harness(
    bank: QuestionBank,
    bank_origin: BankOrigin,
    repo: Arc<InMemoryRepository>,
) -> ViewHarness {
    let quiz_loop = Arc::new(
        QuizLoopService::new(fixed_clock(), Arc::new(bank), repo.clone()).with_rng_seed(7),
    );
    let handles = QuizTestHandles::default();
    let app = Arc::new(TestApp {
        quiz_loop,
        bank_origin,
    });

    let dom = VirtualDom::new_with_props(
        QuizRouterHarness,
        QuizHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    ViewHarness { dom, repo, handles }
}
