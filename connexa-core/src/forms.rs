use thiserror::Error;

use crate::models::{CreateApplicationInput, CreateReferralPayload, RegisterPayload};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Preencha o campo obrigatório: {0}")]
    Required(&'static str),
}

fn require(value: &str, label: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Required(label));
    }
    Ok(())
}

/// Read the invite token from the `token` query value; blank means absent.
pub fn invite_token(query_value: Option<&str>) -> Option<String> {
    query_value
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub company: String,
    pub motivation: String,
}

impl ApplicationForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "Nome")?;
        require(&self.email, "Email")?;
        require(&self.motivation, "Motivação")?;
        Ok(())
    }

    pub fn to_payload(&self) -> Result<CreateApplicationInput, FormError> {
        self.validate()?;
        let company = if self.company.trim().is_empty() {
            None
        } else {
            Some(self.company.clone())
        };
        Ok(CreateApplicationInput {
            name: self.name.clone(),
            email: self.email.clone(),
            company,
            motivation: self.motivation.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clear after an accepted submit; a refused one keeps the typed values.
    pub fn settle<T, E>(&mut self, outcome: &Result<T, E>) {
        if outcome.is_ok() {
            self.clear();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub company: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.name, "Nome")?;
        require(&self.email, "Email")
    }

    pub fn to_payload(&self) -> Result<RegisterPayload, FormError> {
        self.validate()?;
        Ok(RegisterPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn settle<T, E>(&mut self, outcome: &Result<T, E>) {
        if outcome.is_ok() {
            self.clear();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferralForm {
    pub to_member_id: String,
    pub company_or_contact: String,
    pub description: String,
}

impl ReferralForm {
    pub fn validate(&self) -> Result<(), FormError> {
        require(&self.to_member_id, "Para Member ID")?;
        require(&self.company_or_contact, "Empresa/Contato")?;
        require(&self.description, "Descrição")
    }

    pub fn to_payload(&self) -> Result<CreateReferralPayload, FormError> {
        self.validate()?;
        Ok(CreateReferralPayload {
            to_member_id: self.to_member_id.clone(),
            company_or_contact: self.company_or_contact.clone(),
            description: self.description.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn settle<T, E>(&mut self, outcome: &Result<T, E>) {
        if outcome.is_ok() {
            self.clear();
        }
    }
}
