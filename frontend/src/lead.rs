use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::phone::digits_only;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    Emagrecer,
    Hipertrofia,
    Condicionamento,
    Reabilitacao,
    Saude,
    Outro,
}

impl Objective {
    pub const ALL: [Objective; 6] = [
        Objective::Emagrecer,
        Objective::Hipertrofia,
        Objective::Condicionamento,
        Objective::Reabilitacao,
        Objective::Saude,
        Objective::Outro,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Objective::Emagrecer => "emagrecer",
            Objective::Hipertrofia => "hipertrofia",
            Objective::Condicionamento => "condicionamento",
            Objective::Reabilitacao => "reabilitacao",
            Objective::Saude => "saude",
            Objective::Outro => "outro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Objective::Emagrecer => "Emagrecer",
            Objective::Hipertrofia => "Hipertrofia",
            Objective::Condicionamento => "Condicionamento",
            Objective::Reabilitacao => "Reabilitação",
            Objective::Saude => "Saúde",
            Objective::Outro => "Outro",
        }
    }
}

impl FromStr for Objective {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Objective::ALL.into_iter().find(|o| o.value() == s).ok_or(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactTime {
    Manha,
    Tarde,
    Noite,
}

impl ContactTime {
    pub const ALL: [ContactTime; 3] = [ContactTime::Manha, ContactTime::Tarde, ContactTime::Noite];

    pub fn value(self) -> &'static str {
        match self {
            ContactTime::Manha => "manha",
            ContactTime::Tarde => "tarde",
            ContactTime::Noite => "noite",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactTime::Manha => "Manhã",
            ContactTime::Tarde => "Tarde",
            ContactTime::Noite => "Noite",
        }
    }
}

impl FromStr for ContactTime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactTime::ALL.into_iter().find(|t| t.value() == s).ok_or(())
    }
}

/// Fields that can carry an inline validation error. Email is optional
/// and never fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Nome,
    Whatsapp,
    Objetivo,
    Horario,
    LgpdConsent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

/// Live form values, mutated one field at a time as the user types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub nome: String,
    /// Masked display value, e.g. `(11) 98765-4321`.
    pub whatsapp: String,
    pub email: String,
    pub objetivo: Option<Objective>,
    pub horario: Option<ContactTime>,
    pub lgpd_consent: bool,
}

pub fn validate(form: &LeadForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if form.nome.trim().is_empty() {
        errors.insert(Field::Nome, "Nome é obrigatório");
    }

    if form.whatsapp.trim().is_empty() {
        errors.insert(Field::Whatsapp, "WhatsApp é obrigatório");
    } else if !matches!(digits_only(&form.whatsapp).len(), 10 | 11) {
        errors.insert(Field::Whatsapp, "WhatsApp inválido");
    }

    if form.objetivo.is_none() {
        errors.insert(Field::Objetivo, "Selecione seu objetivo");
    }

    if form.horario.is_none() {
        errors.insert(Field::Horario, "Selecione o melhor horário");
    }

    if !form.lgpd_consent {
        errors.insert(Field::LgpdConsent, "Você precisa concordar para continuar");
    }

    errors
}

/// Body posted to the webhook.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    pub nome: String,
    pub whatsapp: String,
    pub email: Option<String>,
    pub objetivo: Objective,
    pub horario: ContactTime,
    pub lgpd_consent: bool,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl LeadForm {
    /// Builds the payload only when every required field validates, so a
    /// partial lead can never be sent.
    pub fn to_payload(&self, timestamp: DateTime<Utc>) -> Result<LeadPayload, FieldErrors> {
        let errors = validate(self);
        match (self.objetivo, self.horario) {
            (Some(objetivo), Some(horario)) if errors.is_empty() => {
                Ok(LeadPayload {
                    nome: self.nome.clone(),
                    whatsapp: digits_only(&self.whatsapp),
                    // blank means absent; otherwise sent as typed, like nome
                    email: (!self.email.trim().is_empty()).then(|| self.email.clone()),
                    objetivo,
                    horario,
                    lgpd_consent: self.lgpd_consent,
                    timestamp,
                })
            }
            _ => Err(errors),
        }
    }
}
