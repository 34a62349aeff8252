//! Flat variable store for one ShonenX run.

use std::collections::BTreeMap;

use shonen_types::ast::VarType;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// A declared variable: its fixed type and current value.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub ty: VarType,
    pub value: Value,
}

/// The single namespace of a run.
///
/// There are no nested scopes. Values handed to [`Memory::set`] must
/// already be coerced to the variable's type.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    variables: BTreeMap<String, Variable>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with its type's default value.
    pub fn declare(&mut self, name: &str, ty: VarType) -> EvalResult<()> {
        if self.variables.contains_key(name) {
            return Err(EvalError::AlreadyDeclared(name.to_string()));
        }
        self.variables.insert(
            name.to_string(),
            Variable {
                ty,
                value: Value::default_for(ty),
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> EvalResult<&Value> {
        self.variable(name).map(|var| &var.value)
    }

    pub fn set(&mut self, name: &str, value: Value) -> EvalResult<()> {
        match self.variables.get_mut(name) {
            Some(var) => {
                var.value = value;
                Ok(())
            }
            None => Err(EvalError::Undeclared(name.to_string())),
        }
    }

    pub fn type_of(&self, name: &str) -> EvalResult<VarType> {
        self.variable(name).map(|var| var.ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// The variable's value as `SHOW` prints it.
    pub fn display(&self, name: &str) -> EvalResult<String> {
        self.variable(name).map(|var| var.value.render(var.ty))
    }

    pub fn variable(&self, name: &str) -> EvalResult<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| EvalError::Undeclared(name.to_string()))
    }

    /// All variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_once() {
        let mut memory = Memory::new();
        memory.declare("hp", VarType::Integer).unwrap();
        assert_eq!(
            memory.declare("hp", VarType::Text),
            Err(EvalError::AlreadyDeclared("hp".into()))
        );
        assert_eq!(memory.type_of("hp"), Ok(VarType::Integer));
    }

    #[test]
    fn test_undeclared_access() {
        let mut memory = Memory::new();
        assert_eq!(memory.get("x"), Err(EvalError::Undeclared("x".into())));
        assert_eq!(
            memory.set("x", Value::Integer(1)),
            Err(EvalError::Undeclared("x".into()))
        );
        assert!(memory.type_of("x").is_err());
        assert!(!memory.contains("x"));
    }

    #[test]
    fn test_set_then_get() {
        let mut memory = Memory::new();
        memory.declare("name", VarType::Text).unwrap();
        assert_eq!(memory.get("name"), Ok(&Value::Text(String::new())));
        memory.set("name", Value::Text("Goku".into())).unwrap();
        assert_eq!(memory.display("name").unwrap(), "Goku");
    }

    #[test]
    fn test_flag_displays_as_digit() {
        let mut memory = Memory::new();
        memory.declare("ready", VarType::Flag).unwrap();
        assert_eq!(memory.display("ready").unwrap(), "0");
        memory.set("ready", Value::Flag(true)).unwrap();
        assert_eq!(memory.display("ready").unwrap(), "1");
    }

    #[test]
    fn test_iter_in_name_order() {
        let mut memory = Memory::new();
        memory.declare("b", VarType::Integer).unwrap();
        memory.declare("a", VarType::Float).unwrap();
        let names: Vec<&str> = memory.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(memory.len(), 2);
    }
}
