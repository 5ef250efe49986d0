//! Generation request value objects

use super::form_fields::FormFields;

/// System and user instructions produced by a template builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPair {
    pub system: String,
    pub user: String,
}

impl InstructionPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// One generation call: instructions plus the form context used for fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    system_instruction: String,
    user_instruction: String,
    context: FormFields,
}

impl GenerationRequest {
    pub fn new(
        system_instruction: impl Into<String>,
        user_instruction: impl Into<String>,
        context: FormFields,
    ) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_instruction: user_instruction.into(),
            context,
        }
    }

    pub fn from_pair(pair: InstructionPair, context: FormFields) -> Self {
        Self::new(pair.system, pair.user, context)
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn user_instruction(&self) -> &str {
        &self.user_instruction
    }

    pub fn context(&self) -> &FormFields {
        &self.context
    }
}
