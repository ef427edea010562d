//! # Record — The Root Element
//!
//! `record` owns the full vocabulary: at least one identifier and one
//! title, optional subtitles (from "3.0"), languages, lifecycle dates,
//! rights, formats, and a description. From version "3.0" the root
//! carries required security markings and the fixed `resourceElement`
//! marker. It is the only kind that admits caller-supplied extension
//! attributes.

use tracing::debug;

use dmrec_core::policy::{self, SECURITY_RESOURCE_ELEMENT};
use dmrec_core::{
    ComponentKind, DmrecError, ModelConfig, SchemaFamily, VersionDescriptor,
};
use dmrec_model::{
    child_output, seal, synthesize_node, Assemble, AttributeGroup, Builder, BuilderList,
    Component, ComponentCore, ExtensibleAttributes, ExtensibleAttributesBuilder,
    NodeAttribute, NodeTree, OutputFormat, QName,
};

use crate::dates::{Dates, DatesBuilder};
use crate::description::{Description, DescriptionBuilder};
use crate::format::{Format, FormatBuilder};
use crate::identifier::{Identifier, IdentifierBuilder};
use crate::language::{Language, LanguageBuilder};
use crate::rights::{Rights, RightsBuilder};
use crate::security::{SecurityAttributes, SecurityAttributesBuilder};
use crate::title::{Subtitle, SubtitleBuilder, Title, TitleBuilder};

/// The root record.
#[derive(Debug, Clone)]
pub struct Record {
    core: ComponentCore,
    identifiers: Vec<Identifier>,
    titles: Vec<Title>,
    subtitles: Vec<Subtitle>,
    languages: Vec<Language>,
    dates: Option<Dates>,
    rights: Option<Rights>,
    formats: Vec<Format>,
    description: Option<Description>,
    security: SecurityAttributes,
    extensible: ExtensibleAttributes,
}

impl Record {
    /// Read a record from a supplied tree node, descending into every
    /// declared child slot in policy order.
    ///
    /// # Errors
    ///
    /// Any violated structural rule of the record or any descendant,
    /// fail-fast; descendant failures gain one locator segment per
    /// enclosing level.
    pub fn from_tree(
        version: &'static VersionDescriptor,
        node: &NodeTree,
    ) -> Result<Self, DmrecError> {
        let qualified = node.qualified_name();
        let ns = node.namespace().to_string();
        let child_nodes = |kind: ComponentKind| {
            node.children_named(&ns, kind.as_str()).collect::<Vec<_>>()
        };
        let nest = |e: DmrecError| e.at(&qualified);

        let identifiers = child_nodes(ComponentKind::Identifier)
            .into_iter()
            .map(|child| Identifier::from_tree(version, child))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nest)?;
        let titles = child_nodes(ComponentKind::Title)
            .into_iter()
            .map(|child| Title::from_tree(version, child))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nest)?;
        let subtitles = child_nodes(ComponentKind::Subtitle)
            .into_iter()
            .map(|child| Subtitle::from_tree(version, child))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nest)?;
        let languages = child_nodes(ComponentKind::Language)
            .into_iter()
            .map(|child| Language::from_tree(version, child))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nest)?;
        let dates = child_nodes(ComponentKind::Dates)
            .into_iter()
            .next()
            .map(|child| Dates::from_tree(version, child))
            .transpose()
            .map_err(nest)?;
        let rights = child_nodes(ComponentKind::Rights)
            .into_iter()
            .next()
            .map(|child| Rights::from_tree(version, child))
            .transpose()
            .map_err(nest)?;
        let formats = child_nodes(ComponentKind::Format)
            .into_iter()
            .map(|child| Format::from_tree(version, child))
            .collect::<Result<Vec<_>, _>>()
            .map_err(nest)?;
        let description = child_nodes(ComponentKind::Description)
            .into_iter()
            .next()
            .map(|child| Description::from_tree(version, child))
            .transpose()
            .map_err(nest)?;

        let security = SecurityAttributes::from_tree(version, node).map_err(nest)?;
        let extensible =
            ExtensibleAttributes::from_tree(version, ComponentKind::Record, node)
                .map_err(nest)?;

        let record = seal(Self {
            identifiers,
            titles,
            subtitles,
            languages,
            dates,
            rights,
            formats,
            description,
            security,
            extensible,
            core: ComponentCore::new(version, node.clone()),
        })?;
        debug!(
            version = %version,
            identifiers = record.identifiers.len(),
            titles = record.titles.len(),
            "record assembled"
        );
        Ok(record)
    }

    /// Build a record from already-constructed components and groups,
    /// synthesizing the tree node (including the fixed marker
    /// attributes mandated at the active version) and then validating
    /// exactly as [`Record::from_tree`] does.
    ///
    /// # Errors
    ///
    /// Same failures as [`Record::from_tree`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_values(
        version: &'static VersionDescriptor,
        identifiers: &[Identifier],
        titles: &[Title],
        subtitles: &[Subtitle],
        languages: &[Language],
        dates: Option<&Dates>,
        rights: Option<&Rights>,
        formats: &[Format],
        description: Option<&Description>,
        security: Option<&SecurityAttributes>,
        extensible: Option<&ExtensibleAttributes>,
    ) -> Result<Self, DmrecError> {
        let mut node = synthesize_node(version, ComponentKind::Record);
        let qualified = node.qualified_name();

        for identifier in identifiers {
            node.push_child(identifier.core().node().clone());
        }
        for title in titles {
            node.push_child(title.core().node().clone());
        }
        for subtitle in subtitles {
            node.push_child(subtitle.core().node().clone());
        }
        for language in languages {
            node.push_child(language.core().node().clone());
        }
        if let Some(dates) = dates {
            node.push_child(dates.core().node().clone());
        }
        if let Some(rights) = rights {
            node.push_child(rights.core().node().clone());
        }
        for format in formats {
            node.push_child(format.core().node().clone());
        }
        if let Some(description) = description {
            node.push_child(description.core().node().clone());
        }

        for fixed in policy::policy(ComponentKind::Record).fixed {
            if fixed.window.contains(version) {
                node.push_attribute(NodeAttribute::new(
                    QName::new(
                        ModelConfig::default().prefix(fixed.family),
                        fixed.local,
                        version.namespace(fixed.family),
                    ),
                    fixed.value,
                ));
            }
        }

        SecurityAttributes::non_null_or_empty(security)
            .attach_to(&mut node)
            .map_err(|e| e.at(&qualified))?;
        ExtensibleAttributes::non_null_or_empty(extensible)
            .attach_to(&mut node)
            .map_err(|e| e.at(&qualified))?;

        Self::from_tree(version, &node)
    }

    /// The record identifiers (at least one).
    pub fn identifiers(&self) -> &[Identifier] {
        &self.identifiers
    }

    /// The record titles (at least one).
    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    /// The subtitles, if any.
    pub fn subtitles(&self) -> &[Subtitle] {
        &self.subtitles
    }

    /// The languages, if any.
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// The lifecycle dates, if present.
    pub fn dates(&self) -> Option<&Dates> {
        self.dates.as_ref()
    }

    /// The rights markings, if present.
    pub fn rights(&self) -> Option<&Rights> {
        self.rights.as_ref()
    }

    /// The formats, if any.
    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    /// The description, if present.
    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    /// The root security markings (required from version "3.0").
    pub fn security(&self) -> &SecurityAttributes {
        &self.security
    }

    /// The admitted extension attributes.
    pub fn extensible(&self) -> &ExtensibleAttributes {
        &self.extensible
    }

    /// The fixed `resourceElement` marker, when mandated at this
    /// version. Policy-fixed; carries no discriminating information and
    /// takes no part in equality or hashing.
    pub fn resource_element(&self) -> Option<&str> {
        self.core.node().attribute_value(
            self.core.version().namespace(SchemaFamily::Security),
            SECURITY_RESOURCE_ELEMENT,
        )
    }
}

impl Assemble for Record {
    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }
}

impl Component for Record {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Record
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn child_components(&self) -> Vec<&dyn Component> {
        let mut children: Vec<&dyn Component> = Vec::new();
        children.extend(self.identifiers.iter().map(|c| c as &dyn Component));
        children.extend(self.titles.iter().map(|c| c as &dyn Component));
        children.extend(self.subtitles.iter().map(|c| c as &dyn Component));
        children.extend(self.languages.iter().map(|c| c as &dyn Component));
        children.extend(self.dates.iter().map(|c| c as &dyn Component));
        children.extend(self.rights.iter().map(|c| c as &dyn Component));
        children.extend(self.formats.iter().map(|c| c as &dyn Component));
        children.extend(self.description.iter().map(|c| c as &dyn Component));
        children
    }

    /// The root contributes no key segment of its own: child keys are
    /// top-level (`identifier.qualifier`, `format.extent.value`), with
    /// security markings under `security.`.
    fn output(
        &self,
        format: OutputFormat,
        config: &ModelConfig,
        prefix: &str,
        _suffix: &str,
    ) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}",
            child_output(format, config, prefix, &self.identifiers),
            child_output(format, config, prefix, &self.titles),
            child_output(format, config, prefix, &self.subtitles),
            child_output(format, config, prefix, &self.languages),
            child_output(format, config, prefix, self.dates.as_slice()),
            child_output(format, config, prefix, self.rights.as_slice()),
            child_output(format, config, prefix, &self.formats),
            child_output(format, config, prefix, self.description.as_slice()),
            self.security
                .output(format, &format!("{prefix}security.")),
        )
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.namespace() == other.namespace()
            && self.identifiers == other.identifiers
            && self.titles == other.titles
            && self.subtitles == other.subtitles
            && self.languages == other.languages
            && self.dates == other.dates
            && self.rights == other.rights
            && self.formats == other.formats
            && self.description == other.description
            && self.security == other.security
            && self.extensible == other.extensible
    }
}

impl Eq for Record {}

impl std::hash::Hash for Record {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.namespace().hash(state);
        self.identifiers.hash(state);
        self.titles.hash(state);
        self.subtitles.hash(state);
        self.languages.hash(state);
        self.dates.hash(state);
        self.rights.hash(state);
        self.formats.hash(state);
        self.description.hash(state);
        self.security.hash(state);
        self.extensible.attributes().hash(state);
    }
}

/// Mutable staging counterpart of [`Record`]. List slots grow
/// explicitly via `ensure_at_least`/`slot_mut`; nested builders exist
/// from the start so field access never fails.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    /// Identifier slots.
    pub identifiers: BuilderList<IdentifierBuilder>,
    /// Title slots.
    pub titles: BuilderList<TitleBuilder>,
    /// Subtitle slots.
    pub subtitles: BuilderList<SubtitleBuilder>,
    /// Language slots.
    pub languages: BuilderList<LanguageBuilder>,
    /// The lifecycle dates.
    pub dates: DatesBuilder,
    /// The rights markings.
    pub rights: RightsBuilder,
    /// Format slots.
    pub formats: BuilderList<FormatBuilder>,
    /// The description.
    pub description: DescriptionBuilder,
    /// The root security markings.
    pub security: SecurityAttributesBuilder,
    /// The extension attributes.
    pub extensible: ExtensibleAttributesBuilder,
}

impl From<&Record> for RecordBuilder {
    fn from(record: &Record) -> Self {
        let mut builder = Self::default();
        for identifier in record.identifiers() {
            builder.identifiers.push(IdentifierBuilder::from(identifier));
        }
        for title in record.titles() {
            builder.titles.push(TitleBuilder::from(title));
        }
        for subtitle in record.subtitles() {
            builder.subtitles.push(SubtitleBuilder::from(subtitle));
        }
        for language in record.languages() {
            builder.languages.push(LanguageBuilder::from(language));
        }
        if let Some(dates) = record.dates() {
            builder.dates = DatesBuilder::from(dates);
        }
        if let Some(rights) = record.rights() {
            builder.rights = RightsBuilder::from(rights);
        }
        for format in record.formats() {
            builder.formats.push(FormatBuilder::from(format));
        }
        if let Some(description) = record.description() {
            builder.description = DescriptionBuilder::from(description);
        }
        builder.security = SecurityAttributesBuilder::from(record.security());
        builder.extensible = ExtensibleAttributesBuilder::from(record.extensible());
        builder
    }
}

impl Builder for RecordBuilder {
    type Target = Record;

    fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
            && self.titles.is_empty()
            && self.subtitles.is_empty()
            && self.languages.is_empty()
            && self.dates.is_empty()
            && self.rights.is_empty()
            && self.formats.is_empty()
            && self.description.is_empty()
            && self.security.is_empty()
            && self.extensible.is_empty()
    }

    fn commit(
        &self,
        version: &'static VersionDescriptor,
    ) -> Result<Option<Record>, DmrecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let identifiers = self.identifiers.commit_all(version)?;
        let titles = self.titles.commit_all(version)?;
        let subtitles = self.subtitles.commit_all(version)?;
        let languages = self.languages.commit_all(version)?;
        let dates = self.dates.commit(version)?;
        let rights = self.rights.commit(version)?;
        let formats = self.formats.commit_all(version)?;
        let description = self.description.commit(version)?;
        let security = self.security.commit(version)?;
        let extensible = self.extensible.commit(version)?;
        Record::from_values(
            version,
            &identifiers,
            &titles,
            &subtitles,
            &languages,
            dates.as_ref(),
            rights.as_ref(),
            &formats,
            description.as_ref(),
            security.as_ref(),
            extensible.as_ref(),
        )
        .map(Some)
    }
}
