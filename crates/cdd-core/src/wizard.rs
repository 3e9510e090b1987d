//! Step-by-step container creation input

use crate::validation::{parse_ports, validate_env_vars, validate_ports};
use crate::{FeedbackMessage, InputField, Severity};

const IMAGE_PROMPT: &str = "Enter image name (e.g. nginx:latest) and press Enter";
const IMAGE_EMPTY: &str = "Image name cannot be empty.";
const NAME_PROMPT: &str = "Optional: Enter container name or leave empty and press Enter";
const PORTS_PROMPT: &str =
    "Optional: Enter ports (format 8080:80,443:443) or leave empty and press Enter";
const PORTS_INVALID: &str =
    "Port format must be host:container and both must be numbers (e.g. 8080:80)";
const PORTS_OUT_OF_RANGE: &str = "Ports must be between 0 and 65535.";
const ENV_PROMPT: &str =
    "Optional: Enter environment variables (format VAR1=val1,VAR2=val2) or leave empty and press Enter";
const ENV_DATABASE_WARNING: &str = "Warning: This image usually requires environment variables \
    (e.g. MYSQL_ROOT_PASSWORD=my-secret-pw for MySQL, POSTGRES_PASSWORD=yourpassword for Postgres). \
    Enter them as VAR=val,VAR2=val2 or leave empty and press Enter.";
const ENV_INVALID: &str =
    "Environment variables must be NAME=value, separated by commas (e.g. FOO=bar,DEBUG=1)";

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Image,
    Name,
    Ports,
    Env,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Image,
            WizardStep::Name,
            WizardStep::Ports,
            WizardStep::Env,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Image => "Image",
            WizardStep::Name => "Name",
            WizardStep::Ports => "Ports",
            WizardStep::Env => "Env",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Image => 0,
            WizardStep::Name => 1,
            WizardStep::Ports => 2,
            WizardStep::Env => 3,
        }
    }
}

/// The four raw field values, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationRequest {
    pub image_name: String,
    pub container_name: String,
    pub port_input: String,
    pub env_input: String,
}

/// What `next_step` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Validation failed; the wizard message explains why
    Stayed,
    Advanced(WizardStep),
    /// Final step passed; the wizard is now inactive
    Submitted(CreationRequest),
}

/// Modal creation flow: Image, Name, Ports, Env.
///
/// Moves strictly forward. Only `cancel` (or submission) resets it.
#[derive(Debug, Clone)]
pub struct CreationWizard {
    active: bool,
    step: WizardStep,
    image: InputField,
    name: InputField,
    ports: InputField,
    env: InputField,
    message: Option<FeedbackMessage>,
    database_images: Vec<String>,
}

impl CreationWizard {
    pub fn new(database_images: Vec<String>) -> Self {
        Self {
            active: false,
            step: WizardStep::Image,
            image: InputField::new(),
            name: InputField::new(),
            ports: InputField::new(),
            env: InputField::new(),
            message: None,
            database_images: database_images
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
        }
    }

    /// Begin a fresh creation flow
    pub fn open(&mut self) {
        self.reset();
        self.active = true;
        self.message = Some(FeedbackMessage::new(IMAGE_PROMPT, Severity::Info));
    }

    /// Abandon the flow and clear every field
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.active = false;
        self.step = WizardStep::Image;
        self.image.clear();
        self.name.clear();
        self.ports.clear();
        self.env.clear();
        self.message = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn message(&self) -> Option<&FeedbackMessage> {
        self.message.as_ref()
    }

    pub fn field(&self, step: WizardStep) -> &InputField {
        match step {
            WizardStep::Image => &self.image,
            WizardStep::Name => &self.name,
            WizardStep::Ports => &self.ports,
            WizardStep::Env => &self.env,
        }
    }

    /// The field being edited on the current step
    pub fn current_field_mut(&mut self) -> &mut InputField {
        match self.step {
            WizardStep::Image => &mut self.image,
            WizardStep::Name => &mut self.name,
            WizardStep::Ports => &mut self.ports,
            WizardStep::Env => &mut self.env,
        }
    }

    fn is_database_image(&self) -> bool {
        let image = self.image.value().trim().to_lowercase();
        self.database_images.iter().any(|db| image.contains(db.as_str()))
    }

    fn say(&mut self, text: &str, severity: Severity) {
        self.message = Some(FeedbackMessage::new(text, severity));
    }

    /// Validate the current step and move forward
    pub fn next_step(&mut self) -> StepOutcome {
        match self.step {
            WizardStep::Image => {
                if self.image.value().trim().is_empty() {
                    self.say(IMAGE_EMPTY, Severity::Error);
                    return StepOutcome::Stayed;
                }
                self.step = WizardStep::Name;
                self.say(NAME_PROMPT, Severity::Info);
            }
            WizardStep::Name => {
                self.step = WizardStep::Ports;
                self.say(PORTS_PROMPT, Severity::Info);
            }
            WizardStep::Ports => {
                if !validate_ports(self.ports.value()) {
                    self.say(PORTS_INVALID, Severity::Error);
                    return StepOutcome::Stayed;
                }
                if parse_ports(self.ports.value()).is_err() {
                    self.say(PORTS_OUT_OF_RANGE, Severity::Error);
                    return StepOutcome::Stayed;
                }
                self.step = WizardStep::Env;
                if self.is_database_image() {
                    self.say(ENV_DATABASE_WARNING, Severity::Warning);
                } else {
                    self.say(ENV_PROMPT, Severity::Info);
                }
            }
            WizardStep::Env => {
                if !validate_env_vars(self.env.value()) {
                    self.say(ENV_INVALID, Severity::Error);
                    return StepOutcome::Stayed;
                }
                let request = CreationRequest {
                    image_name: self.image.value().to_string(),
                    container_name: self.name.value().to_string(),
                    port_input: self.ports.value().to_string(),
                    env_input: self.env.value().to_string(),
                };
                self.reset();
                return StepOutcome::Submitted(request);
            }
        }
        StepOutcome::Advanced(self.step)
    }
}
