//! Command schemas: parameter classification, argument parsing, and
//! reassembly of handler arguments by ordinal.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{
    ArgError, ArgType, ArgValue, GlobalFlags, HandlerError, RegistrationError, SlashRequest,
};

/// A literal default value whose native type selects the argument type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Text default; resolves to unbounded text.
    Text(String),
    /// Integer default; resolves to an unbounded integer.
    Int(i64),
    /// Float default; resolves to an unbounded float.
    Float(f64),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A bare type annotation on a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeType {
    /// String annotation.
    Str,
    /// Integer annotation.
    Int,
    /// Float annotation.
    Float,
    /// Any other annotation; never resolvable.
    Other(String),
}

/// How a parameter was declared.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterKind {
    /// Receives the inbound request.
    Context,
    /// Boolean presence of `--name`.
    Flag,
    /// Positional argument with an explicit type.
    Argument(ArgType),
    /// Positional argument typed by its literal default.
    Default(Literal),
    /// Positional argument typed by a bare annotation.
    Annotated(NativeType),
    /// Neither annotation nor default.
    Untyped,
}

/// One declared handler parameter, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParameterKind,
    help: Option<String>,
}

impl Parameter {
    fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            help: None,
        }
    }

    /// Parameter receiving the inbound request.
    #[must_use]
    pub fn context(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Context)
    }

    /// Flag parameter set by `--name`.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Flag)
    }

    /// Positional argument of the given type.
    #[must_use]
    pub fn argument(name: impl Into<String>, arg_type: ArgType) -> Self {
        Self::new(name, ParameterKind::Argument(arg_type))
    }

    /// Positional argument typed by a literal default.
    #[must_use]
    pub fn with_default(name: impl Into<String>, default: impl Into<Literal>) -> Self {
        Self::new(name, ParameterKind::Default(default.into()))
    }

    /// Positional argument typed by an annotation.
    #[must_use]
    pub fn annotated(name: impl Into<String>, native: NativeType) -> Self {
        Self::new(name, ParameterKind::Annotated(native))
    }

    /// Parameter with no type information.
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Untyped)
    }

    /// Attaches help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> &ParameterKind {
        &self.kind
    }
}

/// A classified positional argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSlot {
    /// Parameter name.
    pub name: String,
    /// Resolved argument type.
    pub arg_type: ArgType,
    /// Position in the original declaration.
    pub ordinal: usize,
    /// Help text.
    pub help: Option<String>,
}

/// A classified flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSlot {
    /// Flag name, used as `--name`.
    pub name: String,
    /// Position in the original declaration.
    pub ordinal: usize,
    /// Help text.
    pub help: Option<String>,
}

/// The classified context parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSlot {
    /// Parameter name.
    pub name: String,
    /// Position in the original declaration.
    pub ordinal: usize,
}

/// Immutable per-command schema built once at registration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandSchema {
    arguments: Vec<ArgumentSlot>,
    flags: Vec<FlagSlot>,
    context: Option<ContextSlot>,
}

impl CommandSchema {
    /// Classifies declared parameters into context, flags and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the declaration is structurally
    /// invalid: duplicate names, a second context parameter, an argument
    /// after a list argument, a reserved flag name, or an unresolvable or
    /// malformed type.
    pub fn build(
        command: &str,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> Result<Self, RegistrationError> {
        let mut schema = Self::default();
        let mut names = HashSet::new();
        let mut after_list = false;

        for (ordinal, Parameter { name, kind, help }) in parameters.into_iter().enumerate() {
            if !names.insert(name.clone()) {
                return Err(RegistrationError::DuplicateParameter {
                    command: command.to_owned(),
                    parameter: name,
                });
            }

            match kind {
                ParameterKind::Context => {
                    if schema.context.is_some() {
                        return Err(RegistrationError::MultipleContextParameters {
                            command: command.to_owned(),
                            parameter: name,
                        });
                    }
                    schema.context = Some(ContextSlot { name, ordinal });
                }
                ParameterKind::Flag => {
                    if GlobalFlags::is_global(&name) {
                        return Err(RegistrationError::ReservedFlagName {
                            command: command.to_owned(),
                            flag: name,
                        });
                    }
                    schema.flags.push(FlagSlot {
                        name,
                        ordinal,
                        help,
                    });
                }
                positional => {
                    if after_list {
                        return Err(RegistrationError::ParameterAfterList {
                            command: command.to_owned(),
                            parameter: name,
                        });
                    }
                    let arg_type = resolve_arg_type(command, &name, positional)?;
                    arg_type.validate(command, &name)?;
                    after_list = arg_type.is_list();
                    schema.arguments.push(ArgumentSlot {
                        name,
                        arg_type,
                        ordinal,
                        help,
                    });
                }
            }
        }

        Ok(schema)
    }

    /// Returns the positional arguments in declaration order.
    #[must_use]
    pub fn arguments(&self) -> &[ArgumentSlot] {
        &self.arguments
    }

    /// Returns the flags in declaration order.
    #[must_use]
    pub fn flags(&self) -> &[FlagSlot] {
        &self.flags
    }

    /// Returns the context parameter, if declared.
    #[must_use]
    pub const fn context(&self) -> Option<&ContextSlot> {
        self.context.as_ref()
    }

    /// Parses residual argument text against the positional arguments.
    ///
    /// A schema with a single text argument receives the whole text unsplit.
    /// Otherwise the text is split on whitespace and each argument consumes
    /// one token, except a list argument which consumes every remaining
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if the token count does not match or any value
    /// fails to parse. Any single failure fails the whole parse.
    pub fn parse_arguments(&self, args: &str) -> Result<Vec<ArgValue>, ArgError> {
        if let [only] = self.arguments.as_slice()
            && only.arg_type.is_text()
        {
            return only.arg_type.parse(args).map(|value| vec![value]);
        }

        let tokens: Vec<&str> = args.split_whitespace().collect();
        let arity_error = || ArgError::WrongArity {
            expected: self.fixed_arity(),
            actual: tokens.len(),
        };

        let mut remaining = tokens.as_slice();
        let mut values = Vec::with_capacity(self.arguments.len());
        for slot in &self.arguments {
            if slot.arg_type.is_list() {
                values.push(slot.arg_type.parse_tokens(remaining)?);
                remaining = &[];
                break;
            }
            let (token, rest) = remaining.split_first().ok_or_else(arity_error)?;
            values.push(slot.arg_type.parse(token)?);
            remaining = rest;
        }

        if remaining.is_empty() {
            Ok(values)
        } else {
            Err(arity_error())
        }
    }

    fn fixed_arity(&self) -> usize {
        self.arguments
            .iter()
            .filter(|slot| !slot.arg_type.is_list())
            .count()
    }

    /// Places parsed values, flag states and the request at their declared
    /// ordinals.
    ///
    /// `values` must be the output of [`Self::parse_arguments`] on this
    /// schema; surplus values are ignored.
    #[must_use]
    pub fn assemble(
        &self,
        values: Vec<ArgValue>,
        flags: &BTreeSet<String>,
        request: SlashRequest,
    ) -> CommandArgs {
        let mut placed = BTreeMap::new();
        for (slot, value) in self.arguments.iter().zip(values) {
            placed.insert(slot.ordinal, (slot.name.clone(), CallValue::Argument(value)));
        }
        for slot in &self.flags {
            let present = flags.contains(&slot.name);
            placed.insert(slot.ordinal, (slot.name.clone(), CallValue::Flag(present)));
        }
        if let Some(slot) = &self.context {
            placed.insert(
                slot.ordinal,
                (slot.name.clone(), CallValue::Context(Box::new(request))),
            );
        }
        CommandArgs {
            entries: placed.into_values().collect(),
        }
    }
}

fn resolve_arg_type(
    command: &str,
    name: &str,
    kind: ParameterKind,
) -> Result<ArgType, RegistrationError> {
    let unresolvable = |reason: String| RegistrationError::UnresolvableParameter {
        command: command.to_owned(),
        parameter: name.to_owned(),
        reason,
    };

    match kind {
        ParameterKind::Argument(arg_type) => Ok(arg_type),
        ParameterKind::Default(Literal::Text(_)) | ParameterKind::Annotated(NativeType::Str) => {
            Ok(ArgType::text())
        }
        ParameterKind::Default(Literal::Int(_)) | ParameterKind::Annotated(NativeType::Int) => {
            Ok(ArgType::int())
        }
        ParameterKind::Default(Literal::Float(_))
        | ParameterKind::Annotated(NativeType::Float) => Ok(ArgType::float()),
        ParameterKind::Annotated(NativeType::Other(annotation)) => {
            Err(unresolvable(format!("unsupported annotation '{annotation}'")))
        }
        ParameterKind::Untyped => Err(unresolvable("no type annotation or default".to_owned())),
        ParameterKind::Context | ParameterKind::Flag => {
            Err(unresolvable("not a positional argument".to_owned()))
        }
    }
}

/// A value placed in a handler's argument slot.
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    /// Parsed positional argument.
    Argument(ArgValue),
    /// Whether the flag was present.
    Flag(bool),
    /// The inbound request.
    Context(Box<SlashRequest>),
}

/// Typed handler arguments, ordered by declared ordinal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommandArgs {
    entries: Vec<(String, CallValue)>,
}

impl CommandArgs {
    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CallValue> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| value)
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CallValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the handler declares no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn argument(&self, name: &str) -> Result<&ArgValue, HandlerError> {
        match self.get(name) {
            Some(CallValue::Argument(value)) => Ok(value),
            Some(_) => Err(wrong_type(name, "positional argument")),
            None => Err(HandlerError::MissingValue(name.to_owned())),
        }
    }

    /// Returns a float argument.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not a float argument.
    pub fn float(&self, name: &str) -> Result<f64, HandlerError> {
        self.argument(name)?
            .as_f64()
            .ok_or_else(|| wrong_type(name, "float"))
    }

    /// Returns an integer argument.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not an integer argument.
    pub fn int(&self, name: &str) -> Result<i64, HandlerError> {
        self.argument(name)?
            .as_i64()
            .ok_or_else(|| wrong_type(name, "int"))
    }

    /// Returns a text or choice argument.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not a text argument.
    pub fn text(&self, name: &str) -> Result<&str, HandlerError> {
        self.argument(name)?
            .as_str()
            .ok_or_else(|| wrong_type(name, "text"))
    }

    /// Returns the elements of a list argument.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not a list argument.
    pub fn list(&self, name: &str) -> Result<&[ArgValue], HandlerError> {
        self.argument(name)?
            .as_list()
            .ok_or_else(|| wrong_type(name, "list"))
    }

    /// Returns the elements of a float list argument.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not a list of floats.
    pub fn float_list(&self, name: &str) -> Result<Vec<f64>, HandlerError> {
        self.list(name)?
            .iter()
            .map(|value| value.as_f64().ok_or_else(|| wrong_type(name, "float list")))
            .collect()
    }

    /// Returns whether a flag was present.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] if `name` is not a declared flag.
    pub fn flag(&self, name: &str) -> Result<bool, HandlerError> {
        match self.get(name) {
            Some(CallValue::Flag(present)) => Ok(*present),
            Some(_) => Err(wrong_type(name, "flag")),
            None => Err(HandlerError::MissingValue(name.to_owned())),
        }
    }

    /// Returns the inbound request.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::MissingValue`] if no context parameter was
    /// declared.
    pub fn request(&self) -> Result<&SlashRequest, HandlerError> {
        self.entries
            .iter()
            .find_map(|(_, value)| match value {
                CallValue::Context(request) => Some(request.as_ref()),
                _ => None,
            })
            .ok_or_else(|| HandlerError::MissingValue("request".to_owned()))
    }
}

fn wrong_type(name: &str, expected: &'static str) -> HandlerError {
    HandlerError::WrongType {
        name: name.to_owned(),
        expected,
    }
}
