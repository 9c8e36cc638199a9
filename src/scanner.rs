//! # Extension Scanner
//!
//! Inspects one loadable extension library and classifies its exported
//! declarations into an [`ExtensionManifest`].
//!
//! A "loadable library" is a declaration-descriptor document: the loader
//! reads a JSON description of the library's exported declarations and the
//! scanner classifies each one against the annotation schema (Command,
//! Control, Field, View tags on "Module"/"View"-shaped declarations).
//! Classification itself is a pure function of the parsed document, so
//! scanning the same library twice yields identical manifests.
//!
//! ## Pipeline
//!
//! 1. **Load** - read and decode the declaration document
//! 2. **Classify** - walk properties, events, methods, and nested enums
//! 3. **Sort** - impose catalog order on the collected commands

use crate::command::{
    Command, CommandKind, Control, EnumMember, Export, ExtensionManifest, Parameter, Translation,
    NO_VALUE,
};
use crate::error::ScanError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Structural shape of an exported declaration. Only these two shapes are
/// scanned; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DeclShape {
    Module,
    View,
}

/// A Command or Control annotation. A tag whose `name` is empty is
/// malformed and treated as absent: the member is skipped, never a fatal
/// error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub translated: bool,
}

/// A declaration-level View annotation overriding the control's display
/// name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewTag {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationDecl {
    pub text: String,
    pub locale: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub value_type: String,
    /// Display tag on the parameter, absent for untagged parameters.
    #[serde(default)]
    pub friendly_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub value_type: String,
    #[serde(default)]
    pub command: Option<Tag>,
    #[serde(default)]
    pub control: Option<Tag>,
    #[serde(default)]
    pub translations: Vec<TranslationDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDecl {
    pub name: String,
    /// Name of the handler type; resolved against the declaration's own
    /// nested delegates.
    pub handler_type: String,
    #[serde(default)]
    pub command: Option<Tag>,
    #[serde(default)]
    pub control: Option<Tag>,
    #[serde(default)]
    pub translations: Vec<TranslationDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub command: Option<Tag>,
    #[serde(default)]
    pub translations: Vec<TranslationDecl>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub underlying_type: String,
    #[serde(default)]
    pub field_tag: Option<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub command: Option<Tag>,
    #[serde(default)]
    pub translations: Vec<TranslationDecl>,
}

/// A nested handler-type signature declared inside a Module/View.
#[derive(Debug, Clone, Deserialize)]
pub struct DelegateDecl {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// One exported declaration of a library.
#[derive(Debug, Clone, Deserialize)]
pub struct Declaration {
    pub qualified_name: String,
    pub shape: DeclShape,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub events: Vec<EventDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub delegates: Vec<DelegateDecl>,
    #[serde(default)]
    pub view_tag: Option<ViewTag>,
}

/// The declaration document describing one loadable library.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDecls {
    pub symbol_scope: String,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

/// Load one extension library and scan it into a manifest.
///
/// An unreadable or undecodable library aborts the whole scan for that
/// library; no partial manifest is ever returned.
pub fn load_library(path: &Path) -> Result<ExtensionManifest, ScanError> {
    tracing::info!("[SCAN] Loading extension library {}", path.display());

    let text = fs::read_to_string(path).map_err(|source| ScanError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let decls: LibraryDecls =
        serde_json::from_str(&text).map_err(|source| ScanError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let manifest = scan(&decls);
    tracing::info!(
        "[SCAN] {}: {} commands, {} controls",
        manifest.symbol_scope,
        manifest.commands.len(),
        manifest.controls.len()
    );
    Ok(manifest)
}

/// Classify a library's declarations into a manifest. Pure: the result is a
/// function of the document alone.
pub fn scan(decls: &LibraryDecls) -> ExtensionManifest {
    let mut commands = Vec::new();
    let mut controls = Vec::new();

    for decl in &decls.declarations {
        scan_declaration(decl, &mut commands, &mut controls);
    }

    sort_commands(&mut commands);

    ExtensionManifest {
        symbol_scope: decls.symbol_scope.clone(),
        commands,
        controls,
    }
}

/// Catalog sorter: stable order by kind rank descending, then friendly name
/// ascending. Depends on manifest content only, never on encounter order.
pub fn sort_commands(commands: &mut [Command]) {
    commands.sort_by(|a, b| {
        b.kind
            .rank()
            .cmp(&a.kind.rank())
            .then_with(|| a.friendly_name.cmp(&b.friendly_name))
    });
}

/// A tag is usable only when it carries a display name.
fn tagged(tag: &Option<Tag>) -> Option<&Tag> {
    tag.as_ref().filter(|t| !t.name.is_empty())
}

fn translations(tag: &Tag, decls: &[TranslationDecl]) -> Vec<Translation> {
    // Localization is opt-in per tag; never probed for speculatively.
    if !tag.translated {
        return Vec::new();
    }
    decls
        .iter()
        .map(|t| Translation {
            text: t.text.clone(),
            locale: t.locale.clone(),
        })
        .collect()
}

fn parameters(params: &[ParamDecl]) -> Vec<Parameter> {
    params
        .iter()
        .map(|p| Parameter {
            internal_name: p.name.clone(),
            display_name: p.name.clone(),
            friendly_name: p.friendly_name.clone().unwrap_or_default(),
            value_type: p.value_type.clone(),
        })
        .collect()
}

/// Recover an event's handler signature from the declaration's own nested
/// delegates. A miss is a degraded result, not an error: the event is still
/// surfaced, with no parameters and no value.
fn resolve_handler<'a>(decl: &'a Declaration, event: &EventDecl) -> Option<&'a DelegateDecl> {
    let found = decl.delegates.iter().find(|d| d.name == event.handler_type);
    if found.is_none() {
        tracing::warn!(
            "[SCAN] {}.{}: handler type {:?} not declared as a nested type, \
             emitting event with degraded signature",
            decl.qualified_name,
            event.name,
            event.handler_type
        );
    }
    found
}

fn scan_declaration(decl: &Declaration, commands: &mut Vec<Command>, controls: &mut Vec<Control>) {
    let mut exports: Vec<Export> = Vec::new();
    let is_view = decl.shape == DeclShape::View;

    for property in &decl.properties {
        if let Some(tag) = tagged(&property.command) {
            tracing::debug!("[SCAN] property command {}.{}", decl.qualified_name, property.name);
            commands.push(Command {
                owner_name: decl.qualified_name.clone(),
                member_name: property.name.clone(),
                friendly_name: tag.name.clone(),
                kind: CommandKind::Property,
                result_type: property.value_type.clone(),
                parameters: Vec::new(),
                members: Vec::new(),
                translations: translations(tag, &property.translations),
            });
        }
        if is_view {
            if let Some(tag) = tagged(&property.control) {
                exports.push(Export {
                    owner_name: decl.qualified_name.clone(),
                    member_name: property.name.clone(),
                    friendly_name: tag.name.clone(),
                    value_type: property.value_type.clone(),
                    parameters: Vec::new(),
                    translations: translations(tag, &property.translations),
                });
            }
        }
    }

    for event in &decl.events {
        if tagged(&event.command).is_none() && (!is_view || tagged(&event.control).is_none()) {
            continue;
        }
        let handler = resolve_handler(decl, event);
        let result_type = handler
            .map(|d| d.return_type.clone())
            .unwrap_or_else(|| NO_VALUE.to_string());
        let params = handler.map(|d| parameters(&d.params)).unwrap_or_default();

        if let Some(tag) = tagged(&event.command) {
            tracing::debug!("[SCAN] event command {}.{}", decl.qualified_name, event.name);
            commands.push(Command {
                owner_name: decl.qualified_name.clone(),
                member_name: event.name.clone(),
                friendly_name: tag.name.clone(),
                kind: CommandKind::Event,
                result_type: result_type.clone(),
                parameters: params.clone(),
                members: Vec::new(),
                translations: translations(tag, &event.translations),
            });
        }
        if is_view {
            if let Some(tag) = tagged(&event.control) {
                exports.push(Export {
                    owner_name: decl.qualified_name.clone(),
                    member_name: event.name.clone(),
                    friendly_name: tag.name.clone(),
                    value_type: result_type,
                    parameters: params,
                    translations: translations(tag, &event.translations),
                });
            }
        }
    }

    for method in &decl.methods {
        if let Some(tag) = tagged(&method.command) {
            let kind = if method.return_type == NO_VALUE {
                CommandKind::Call
            } else {
                CommandKind::Logic
            };
            tracing::debug!("[SCAN] {:?} command {}.{}", kind, decl.qualified_name, method.name);
            commands.push(Command {
                owner_name: decl.qualified_name.clone(),
                member_name: method.name.clone(),
                friendly_name: tag.name.clone(),
                kind,
                result_type: method.return_type.clone(),
                parameters: parameters(&method.params),
                members: Vec::new(),
                translations: translations(tag, &method.translations),
            });
        }
    }

    for enumeration in &decl.enums {
        if let Some(tag) = tagged(&enumeration.command) {
            // Untagged fields are skipped without comment.
            let members = enumeration
                .fields
                .iter()
                .filter_map(|field| {
                    tagged(&field.field_tag).map(|field_tag| EnumMember {
                        field_name: field.name.clone(),
                        qualified_path: format!(
                            "{}.{}.{}",
                            decl.qualified_name, enumeration.name, field.name
                        ),
                        friendly_name: field_tag.name.clone(),
                        underlying_type: field.underlying_type.clone(),
                    })
                })
                .collect();

            commands.push(Command {
                owner_name: decl.qualified_name.clone(),
                member_name: enumeration.name.clone(),
                friendly_name: tag.name.clone(),
                kind: CommandKind::Enum,
                result_type: format!("{}.{}", decl.qualified_name, enumeration.name),
                parameters: Vec::new(),
                members,
                translations: translations(tag, &enumeration.translations),
            });
        }
    }

    if is_view {
        let friendly_name = decl
            .view_tag
            .as_ref()
            .filter(|v| !v.name.is_empty())
            .map(|v| v.name.clone())
            .unwrap_or_else(|| decl.qualified_name.clone());
        controls.push(Control {
            friendly_name,
            qualified_name: decl.qualified_name.clone(),
            exports,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_tag(name: &str) -> Option<Tag> {
        Some(Tag {
            name: name.to_string(),
            translated: false,
        })
    }

    fn module(qualified_name: &str) -> Declaration {
        Declaration {
            qualified_name: qualified_name.to_string(),
            shape: DeclShape::Module,
            properties: Vec::new(),
            events: Vec::new(),
            methods: Vec::new(),
            enums: Vec::new(),
            delegates: Vec::new(),
            view_tag: None,
        }
    }

    fn library(declarations: Vec<Declaration>) -> LibraryDecls {
        LibraryDecls {
            symbol_scope: "Acme.Robots".to_string(),
            declarations,
        }
    }

    #[test]
    fn untagged_property_produces_nothing() {
        let mut decl = module("Acme.Robots.Arm");
        decl.properties.push(PropertyDecl {
            name: "Angle".to_string(),
            value_type: "double".to_string(),
            command: None,
            control: None,
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert!(manifest.commands.is_empty());
        assert!(manifest.controls.is_empty());
    }

    #[test]
    fn malformed_tag_is_treated_as_absent() {
        let mut decl = module("Acme.Robots.Arm");
        decl.properties.push(PropertyDecl {
            name: "Angle".to_string(),
            value_type: "double".to_string(),
            command: Some(Tag::default()),
            control: None,
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert!(manifest.commands.is_empty());
    }

    #[test]
    fn method_kind_splits_on_result_type() {
        let mut decl = module("Acme.Robots.Arm");
        decl.methods.push(MethodDecl {
            name: "Reset".to_string(),
            return_type: NO_VALUE.to_string(),
            params: Vec::new(),
            command: command_tag("reset the arm"),
            translations: Vec::new(),
        });
        decl.methods.push(MethodDecl {
            name: "Measure".to_string(),
            return_type: "double".to_string(),
            params: vec![ParamDecl {
                name: "axis".to_string(),
                value_type: "int".to_string(),
                friendly_name: Some("axis number".to_string()),
            }],
            command: command_tag("measure an axis"),
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert_eq!(manifest.commands.len(), 2);

        let call = manifest
            .commands
            .iter()
            .find(|c| c.member_name == "Reset")
            .unwrap();
        assert_eq!(call.kind, CommandKind::Call);
        assert!(call.is_void());

        let logic = manifest
            .commands
            .iter()
            .find(|c| c.member_name == "Measure")
            .unwrap();
        assert_eq!(logic.kind, CommandKind::Logic);
        assert_eq!(logic.parameters.len(), 1);
        assert_eq!(logic.parameters[0].internal_name, "axis");
        assert_eq!(logic.parameters[0].friendly_name, "axis number");
    }

    #[test]
    fn event_signature_resolves_against_nested_delegates() {
        let mut decl = module("Acme.Robots.Arm");
        decl.delegates.push(DelegateDecl {
            name: "MovedHandler".to_string(),
            return_type: NO_VALUE.to_string(),
            params: vec![ParamDecl {
                name: "distance".to_string(),
                value_type: "double".to_string(),
                friendly_name: None,
            }],
        });
        decl.events.push(EventDecl {
            name: "Moved".to_string(),
            handler_type: "MovedHandler".to_string(),
            command: command_tag("when the arm moves"),
            control: None,
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        let event = &manifest.commands[0];
        assert_eq!(event.kind, CommandKind::Event);
        assert_eq!(event.parameters.len(), 1);
        assert_eq!(event.parameters[0].internal_name, "distance");
        assert_eq!(event.parameters[0].friendly_name, "");
    }

    #[test]
    fn unresolved_handler_degrades_without_failing() {
        let mut decl = module("Acme.Robots.Arm");
        decl.events.push(EventDecl {
            name: "Moved".to_string(),
            handler_type: "ElsewhereHandler".to_string(),
            command: command_tag("when the arm moves"),
            control: None,
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert_eq!(manifest.commands.len(), 1);
        let event = &manifest.commands[0];
        assert_eq!(event.kind, CommandKind::Event);
        assert!(event.parameters.is_empty());
        assert_eq!(event.result_type, NO_VALUE);
    }

    #[test]
    fn fully_untagged_enum_keeps_an_empty_payload() {
        let mut decl = module("Acme.Robots.Arm");
        decl.enums.push(EnumDecl {
            name: "Speed".to_string(),
            fields: vec![
                FieldDecl {
                    name: "Slow".to_string(),
                    underlying_type: "int".to_string(),
                    field_tag: None,
                },
                FieldDecl {
                    name: "Fast".to_string(),
                    underlying_type: "int".to_string(),
                    field_tag: None,
                },
            ],
            command: command_tag("arm speed"),
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert_eq!(manifest.commands.len(), 1);
        assert_eq!(manifest.commands[0].kind, CommandKind::Enum);
        assert!(manifest.commands[0].members.is_empty());
    }

    #[test]
    fn tagged_enum_fields_get_qualified_paths() {
        let mut decl = module("Acme.Robots.Arm");
        decl.enums.push(EnumDecl {
            name: "Speed".to_string(),
            fields: vec![FieldDecl {
                name: "Slow".to_string(),
                underlying_type: "int".to_string(),
                field_tag: command_tag("slow"),
            }],
            command: command_tag("arm speed"),
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        let member = &manifest.commands[0].members[0];
        assert_eq!(member.qualified_path, "Acme.Robots.Arm.Speed.Slow");
        assert_eq!(member.friendly_name, "slow");
    }

    #[test]
    fn view_controls_keep_encounter_order_and_collect_exports() {
        let mut view = module("Acme.Robots.Panel");
        view.shape = DeclShape::View;
        view.view_tag = Some(ViewTag {
            name: "robot panel".to_string(),
        });
        view.properties.push(PropertyDecl {
            name: "Status".to_string(),
            value_type: "string".to_string(),
            command: None,
            control: command_tag("status readout"),
            translations: Vec::new(),
        });

        let mut unnamed = module("Acme.Robots.RawPanel");
        unnamed.shape = DeclShape::View;

        let manifest = scan(&library(vec![view, unnamed]));
        assert_eq!(manifest.controls.len(), 2);
        assert_eq!(manifest.controls[0].friendly_name, "robot panel");
        assert_eq!(manifest.controls[0].exports.len(), 1);
        assert_eq!(manifest.controls[0].exports[0].member_name, "Status");
        // No explicit view tag falls back to the qualified name.
        assert_eq!(manifest.controls[1].friendly_name, "Acme.Robots.RawPanel");
    }

    #[test]
    fn control_tags_outside_views_are_ignored() {
        let mut decl = module("Acme.Robots.Arm");
        decl.properties.push(PropertyDecl {
            name: "Status".to_string(),
            value_type: "string".to_string(),
            command: None,
            control: command_tag("status readout"),
            translations: Vec::new(),
        });

        let manifest = scan(&library(vec![decl]));
        assert!(manifest.commands.is_empty());
        assert!(manifest.controls.is_empty());
    }

    #[test]
    fn translations_attach_only_when_opted_in() {
        let mut decl = module("Acme.Robots.Arm");
        decl.properties.push(PropertyDecl {
            name: "Angle".to_string(),
            value_type: "double".to_string(),
            command: Some(Tag {
                name: "arm angle".to_string(),
                translated: true,
            }),
            control: None,
            translations: vec![TranslationDecl {
                text: "팔 각도".to_string(),
                locale: "ko-KR".to_string(),
            }],
        });
        decl.properties.push(PropertyDecl {
            name: "Length".to_string(),
            value_type: "double".to_string(),
            command: command_tag("arm length"),
            control: None,
            translations: vec![TranslationDecl {
                text: "팔 길이".to_string(),
                locale: "ko-KR".to_string(),
            }],
        });

        let manifest = scan(&library(vec![decl]));
        let angle = manifest
            .commands
            .iter()
            .find(|c| c.member_name == "Angle")
            .unwrap();
        assert_eq!(angle.translations.len(), 1);
        assert_eq!(angle.translations[0].locale, "ko-KR");

        let length = manifest
            .commands
            .iter()
            .find(|c| c.member_name == "Length")
            .unwrap();
        assert!(length.translations.is_empty());
    }

    #[test]
    fn catalog_order_is_independent_of_encounter_order() {
        let build = |reversed: bool| {
            let mut decl = module("Acme.Robots.Arm");
            decl.methods.push(MethodDecl {
                name: "Reset".to_string(),
                return_type: NO_VALUE.to_string(),
                params: Vec::new(),
                command: command_tag("reset"),
                translations: Vec::new(),
            });
            decl.properties.push(PropertyDecl {
                name: "Angle".to_string(),
                value_type: "double".to_string(),
                command: command_tag("angle"),
                control: None,
                translations: Vec::new(),
            });
            decl.enums.push(EnumDecl {
                name: "Speed".to_string(),
                fields: Vec::new(),
                command: command_tag("speed"),
                translations: Vec::new(),
            });
            if reversed {
                decl.properties.reverse();
                decl.methods.reverse();
            }
            scan(&library(vec![decl]))
        };

        let a = build(false);
        let b = build(true);
        assert_eq!(a, b);

        let kinds: Vec<CommandKind> = a.commands.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![CommandKind::Enum, CommandKind::Property, CommandKind::Call]
        );
    }

    #[test]
    fn ties_sort_by_friendly_name() {
        let mut commands = vec![
            Command {
                owner_name: "o".to_string(),
                member_name: "B".to_string(),
                friendly_name: "beta".to_string(),
                kind: CommandKind::Logic,
                result_type: "int".to_string(),
                parameters: Vec::new(),
                members: Vec::new(),
                translations: Vec::new(),
            },
            Command {
                owner_name: "o".to_string(),
                member_name: "A".to_string(),
                friendly_name: "alpha".to_string(),
                kind: CommandKind::Logic,
                result_type: "int".to_string(),
                parameters: Vec::new(),
                members: Vec::new(),
                translations: Vec::new(),
            },
        ];
        sort_commands(&mut commands);
        assert_eq!(commands[0].friendly_name, "alpha");
        assert_eq!(commands[1].friendly_name, "beta");
    }
}
