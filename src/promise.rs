use crate::outcome::Outcome;

type Transform<'a, T> = Box<dyn FnOnce(Outcome<T>) -> Outcome<T> + 'a>;

enum Step<'a, T> {
    /// Receives the payload of the previous outcome.
    Data(Box<dyn FnOnce(T) -> Outcome<T> + 'a>),
    /// Receives the previous outcome as a whole.
    Outcome(Transform<'a, T>),
}

/// An ordered chain of fallible steps, run by `resolve()`.
///
/// Each step starts from the outcome of its predecessor, and the chain stops at
/// the first step producing an error. Nothing runs before `resolve()` is called.
pub struct Promise<'a, T> {
    result: Outcome<T>,
    steps: Vec<Step<'a, T>>,
    on_success: Option<Transform<'a, T>>,
    on_failure: Option<Transform<'a, T>>,
}

impl<'a, T: 'a> Promise<'a, T> {
    pub fn new(value: T) -> Self {
        Promise {
            result: Outcome::success(value),
            steps: Vec::new(),
            on_success: None,
            on_failure: None,
        }
    }

    /// Add a step receiving the previous payload.
    pub fn then<R>(mut self, step: impl FnOnce(T) -> R + 'a) -> Self
    where
        R: Into<Outcome<T>>,
    {
        self.steps
            .push(Step::Data(Box::new(move |data| step(data).into())));
        self
    }

    /// Add a step receiving the previous outcome, code and success flag included.
    pub fn then_outcome<R>(mut self, step: impl FnOnce(Outcome<T>) -> R + 'a) -> Self
    where
        R: Into<Outcome<T>>,
    {
        self.steps
            .push(Step::Outcome(Box::new(move |outcome| step(outcome).into())));
        self
    }

    pub fn on_success(mut self, finalize: impl FnOnce(Outcome<T>) -> Outcome<T> + 'a) -> Self {
        self.on_success = Some(Box::new(finalize));
        self
    }

    pub fn on_failure(mut self, finalize: impl FnOnce(Outcome<T>) -> Outcome<T> + 'a) -> Self {
        self.on_failure = Some(Box::new(finalize));
        self
    }

    pub fn resolve(self) -> Outcome<T> {
        let Promise {
            mut result,
            steps,
            on_success,
            on_failure,
        } = self;

        for step in steps {
            result = match step {
                Step::Data(step) => step(result.into_data()),
                Step::Outcome(step) => step(result),
            };
            if result.is_error() {
                break;
            }
        }

        let finalize = if result.is_error() {
            on_failure
        } else {
            on_success
        };
        match finalize {
            Some(finalize) => finalize(result),
            None => result,
        }
    }
}
