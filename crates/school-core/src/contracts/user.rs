//! User account and login contracts.
//!
//! Passwords are validated for shape only; hashing and sessions live
//! outside this crate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{one_of, text};
use crate::types::UserRole;
use crate::validation::{Contract, Rule, ValidatedInput};

static HAS_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]").expect("letter pattern compiles"));
static HAS_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("digit pattern compiles"));

fn password() -> Vec<Rule> {
    vec![
        Rule::IsString,
        Rule::MinLength(8),
        Rule::MaxLength(64),
        Rule::Matches {
            pattern: &HAS_LETTER,
            reason: "must contain a letter",
        },
        Rule::Matches {
            pattern: &HAS_DIGIT,
            reason: "must contain a digit",
        },
    ]
}

fn email() -> Vec<Rule> {
    vec![Rule::IsString, Rule::Email]
}

pub static CREATE_USER: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateUser")
        .required("name", text(100))
        .required("email", email())
        .required("password", password())
        .required("role", one_of(UserRole::VALUES))
        .optional("phone", vec![Rule::IsString, Rule::Phone])
});

pub static UPDATE_USER: Lazy<Contract> = Lazy::new(|| CREATE_USER.partial());

/// Login checks presence only.
pub static LOGIN: Lazy<Contract> = Lazy::new(|| {
    Contract::new("Login")
        .required("email", email())
        .required("password", vec![Rule::IsString, Rule::NotEmpty])
});

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub phone: Option<String>,
}

impl ValidatedInput for CreateUser {
    fn contract() -> &'static Contract {
        &CREATE_USER
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
}

impl ValidatedInput for UpdateUser {
    fn contract() -> &'static Contract {
        &UPDATE_USER
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl ValidatedInput for Login {
    fn contract() -> &'static Contract {
        &LOGIN
    }
}
