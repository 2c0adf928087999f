//! Login Form Consumer Flow
//!
//! A view model and a view built only from the public API: string variables
//! fed by input events, a boolean variable that gates the submit button, and
//! an optional-alert signal the view presents when non-empty.

use std::sync::Arc;

use parking_lot::Mutex;

use emit_core::{AsOwner, ObservableVariable, Owner, SerialQueue, Signal};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Alert {
    title: String,
    message: String,
}

impl Alert {
    fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2)
        }
        None => false,
    }
}

fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

struct LoginViewModel {
    owner: Owner,
    login_credentials_valid: ObservableVariable<bool>,
    email: ObservableVariable<String>,
    password: ObservableVariable<String>,
    alert_to_display: Signal<Option<Alert>>,
}

impl AsOwner for LoginViewModel {
    fn owner(&self) -> &Owner {
        &self.owner
    }
}

impl LoginViewModel {
    fn new(queue: &SerialQueue) -> Arc<Self> {
        let model = Arc::new(Self {
            owner: Owner::new(),
            login_credentials_valid: ObservableVariable::new(false),
            email: ObservableVariable::new(String::new()),
            password: ObservableVariable::new(String::new()),
            alert_to_display: Signal::new(),
        });

        for input in [&model.email, &model.password] {
            let this = Arc::downgrade(&model);
            input.signal().subscribe(&*model, queue, move |_| {
                if let Some(model) = this.upgrade() {
                    model.validate_input();
                }
            });
        }

        model
    }

    fn login(&self, succeeds: bool) {
        let alert = if succeeds {
            Alert::new("Success", "You are now logged in!")
        } else {
            Alert::new("Error", "Login failed. Please try again.")
        };
        self.alert_to_display.emit(Some(alert));
    }

    fn validate_input(&self) {
        let valid = is_valid_email(&self.email.get()) && is_valid_password(&self.password.get());
        self.login_credentials_valid.set(valid);
    }
}

#[derive(Default)]
struct LoginView {
    owner: Owner,
    submit_enabled: Arc<Mutex<bool>>,
    presented: Arc<Mutex<Vec<Alert>>>,
}

impl AsOwner for LoginView {
    fn owner(&self) -> &Owner {
        &self.owner
    }
}

impl LoginView {
    fn bind(&self, model: &LoginViewModel, queue: &SerialQueue) {
        let enabled = self.submit_enabled.clone();
        model
            .login_credentials_valid
            .signal()
            .subscribe(self, queue, move |valid| *enabled.lock() = valid);

        let presented = self.presented.clone();
        model.alert_to_display.subscribe(self, queue, move |alert| {
            if let Some(alert) = alert {
                presented.lock().push(alert);
            }
        });
    }
}

#[test]
fn validators() {
    assert!(is_valid_email("ada@example.com"));
    assert!(!is_valid_email("ada@example"));
    assert!(!is_valid_email("@example.com"));
    assert!(!is_valid_email("ada.example.com"));

    assert!(is_valid_password("abcdefg1"));
    assert!(!is_valid_password("abcdefgh"));
    assert!(!is_valid_password("12345678"));
    assert!(!is_valid_password("abc1"));
    assert!(!is_valid_password("abcdefg1!"));
}

#[test]
fn submit_enables_once_both_inputs_are_valid() {
    let queue = SerialQueue::new("main").unwrap();
    let model = LoginViewModel::new(&queue);
    let view = LoginView::default();
    view.bind(&model, &queue);

    model.email.set("ada@example.com".into());
    queue.flush();
    assert!(!*view.submit_enabled.lock());

    model.password.set("hunter22".into());
    queue.flush();
    // The validation ran on the queue and queued the button update behind it.
    queue.flush();
    assert!(*view.submit_enabled.lock());

    model.password.set("short1".into());
    queue.flush();
    queue.flush();
    assert!(!*view.submit_enabled.lock());
}

#[test]
fn alerts_are_presented_when_present() {
    let queue = SerialQueue::new("main").unwrap();
    let model = LoginViewModel::new(&queue);
    let view = LoginView::default();
    view.bind(&model, &queue);

    model.alert_to_display.emit(None);
    model.login(true);
    model.login(false);
    queue.flush();

    let presented = view.presented.lock();
    assert_eq!(presented.len(), 2);
    assert_eq!(presented[0].title, "Success");
    assert_eq!(presented[1].title, "Error");
    assert_eq!(presented[1].message, "Login failed. Please try again.");
}

#[test]
fn dismissed_view_stops_observing() {
    let queue = SerialQueue::new("main").unwrap();
    let model = LoginViewModel::new(&queue);
    let view = LoginView::default();
    view.bind(&model, &queue);
    let presented = view.presented.clone();

    drop(view);
    model.login(true);
    queue.flush();

    assert!(presented.lock().is_empty());
    assert_eq!(model.alert_to_display.subscriber_count(), 0);
}

#[test]
fn dropped_view_model_stops_validating() {
    let queue = SerialQueue::new("main").unwrap();
    let model = LoginViewModel::new(&queue);
    let email = model.email.signal().clone();

    drop(model);
    email.emit("ada@example.com".into());
    queue.flush();

    assert_eq!(email.subscriber_count(), 0);
}
