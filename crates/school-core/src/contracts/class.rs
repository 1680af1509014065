//! Class contracts.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{flag, id, text};
use crate::validation::{Contract, Rule, ValidatedInput};

pub static CREATE_CLASS: Lazy<Contract> = Lazy::new(|| {
    Contract::new("CreateClass")
        .required("className", text(50))
        .optional("classRoom", vec![Rule::IsString, Rule::MaxLength(50)])
        .required("schoolId", id())
        .required("classTeacherId", id())
        .required(
            "subjects",
            vec![Rule::IsArray, Rule::ArrayNotEmpty, Rule::Each(id())],
        )
        .optional("isActive", flag())
});

pub static UPDATE_CLASS: Lazy<Contract> = Lazy::new(|| CREATE_CLASS.partial());

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClass {
    pub class_name: String,
    pub class_room: Option<String>,
    pub school_id: String,
    pub class_teacher_id: String,
    pub subjects: Vec<String>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for CreateClass {
    fn contract() -> &'static Contract {
        &CREATE_CLASS
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClass {
    pub class_name: Option<String>,
    pub class_room: Option<String>,
    pub school_id: Option<String>,
    pub class_teacher_id: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl ValidatedInput for UpdateClass {
    fn contract() -> &'static Contract {
        &UPDATE_CLASS
    }
}
