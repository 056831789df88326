//! Author (Person) codec: Atom core tags plus Portable Contacts.

use roxmltree::Node;

use ostatus_common::{ProtocolError, ProtocolResult};
use ostatus_model::{Account, Address, ExtendedName, ObjectKind, Organization, Person};

use super::ns::{ATOM_NS, POCO_NS, ROOT_NS_DECLS};
use super::{format_date, format_timestamp, node_text, parse_date, parse_timestamp};
use crate::xml::XmlWriter;

/// Serialize a person as a standalone `<author>` document.
pub fn serialize_person(person: &Person) -> ProtocolResult<String> {
    let mut writer = XmlWriter::new();
    write_person(&mut writer, person, "author", true)?;
    writer.finish()
}

/// Parse a person from a standalone document.
pub fn parse_person(xml: &str) -> ProtocolResult<Person> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ProtocolError::MalformedXml(e.to_string()))?;

    let root = doc.root_element();
    let node = if root.has_tag_name((ATOM_NS, "author")) {
        root
    } else {
        doc.descendants()
            .find(|n| n.has_tag_name((ATOM_NS, "author")))
            .ok_or(ProtocolError::MissingElement("author"))?
    };

    parse_person_node(node)
}

/// Write a person sub-tree under the given tag (`author`,
/// `activity:actor`, `contributor`, or `activity:object`).
pub(crate) fn write_person(
    writer: &mut XmlWriter,
    person: &Person,
    tag: &str,
    declare_ns: bool,
) -> ProtocolResult<()> {
    if declare_ns {
        writer.start(tag, &ROOT_NS_DECLS)?;
    } else {
        writer.start(tag, &[])?;
    }

    if let Some(uid) = &person.uid {
        writer.text_element("poco:id", &[], uid)?;
        writer.text_element("id", &[], uid)?;
    }
    if let Some(uri) = &person.uri {
        writer.text_element("uri", &[], uri)?;
    }
    if let Some(name) = &person.name {
        writer.text_element("name", &[], name)?;
    }
    if let Some(display_name) = &person.display_name {
        writer.text_element("poco:displayName", &[], display_name)?;
    }
    if let Some(preferred_username) = &person.preferred_username {
        writer.text_element("poco:preferredUsername", &[], preferred_username)?;
    }
    if let Some(note) = &person.note {
        writer.text_element("poco:note", &[], note)?;
    }

    if let Some(address) = &person.address {
        write_address(writer, address)?;
    }
    if let Some(organization) = &person.organization {
        write_organization(writer, organization)?;
    }
    if let Some(extended_name) = &person.extended_name {
        write_extended_name(writer, extended_name)?;
    }
    if let Some(account) = &person.account {
        write_account(writer, account)?;
    }

    if let Some(anniversary) = &person.anniversary {
        writer.text_element("poco:anniversary", &[], &format_date(*anniversary))?;
    }
    if let Some(birthday) = &person.birthday {
        writer.text_element("poco:birthday", &[], &format_date(*birthday))?;
    }
    if let Some(email) = &person.email {
        writer.text_element("email", &[], email)?;
    }
    if let Some(gender) = &person.gender {
        writer.text_element("poco:gender", &[], gender)?;
    }
    if let Some(nickname) = &person.nickname {
        writer.text_element("poco:nickname", &[], nickname)?;
    }

    writer.text_element("activity:object-type", &[], &ObjectKind::person().to_wire())?;

    if let Some(published) = &person.published {
        let stamp = format_timestamp(*published);
        writer.text_element("published", &[], &stamp)?;
        writer.text_element("poco:published", &[], &stamp)?;
    }
    if let Some(updated) = &person.updated {
        let stamp = format_timestamp(*updated);
        writer.text_element("updated", &[], &stamp)?;
        writer.text_element("poco:updated", &[], &stamp)?;
    }

    if let Some(uri) = &person.uri {
        writer.empty(
            "link",
            &[("rel", "self"), ("type", "application/atom+xml"), ("href", uri)],
        )?;
    }

    writer.end(tag)
}

/// Parse a person from an author-shaped sub-tree.
pub(crate) fn parse_person_node(node: Node<'_, '_>) -> ProtocolResult<Person> {
    let mut person = Person::default();

    for child in node.children().filter(Node::is_element) {
        let ns = child.tag_name().namespace().unwrap_or_default();
        let name = child.tag_name().name();
        let text = node_text(child);

        match (ns, name) {
            (ATOM_NS, "id") => person.uid = Some(text),
            (ATOM_NS, "email") => person.email = Some(text),
            (ATOM_NS, "name") => person.name = Some(text),
            (ATOM_NS, "uri") => person.uri = Some(text),
            (ATOM_NS, "published") => person.published = Some(parse_timestamp(&text)?),
            (ATOM_NS, "updated") => person.updated = Some(parse_timestamp(&text)?),
            // poco:id and poco timestamps are fallbacks only; the Atom
            // core tags win when both are present.
            (POCO_NS, "id") => {
                if person.uid.is_none() {
                    person.uid = Some(text);
                }
            }
            (POCO_NS, "published") => {
                if person.published.is_none() {
                    person.published = Some(parse_timestamp(&text)?);
                }
            }
            (POCO_NS, "updated") => {
                if person.updated.is_none() {
                    person.updated = Some(parse_timestamp(&text)?);
                }
            }
            (POCO_NS, "displayName") => person.display_name = Some(text),
            (POCO_NS, "preferredUsername") => person.preferred_username = Some(text),
            (POCO_NS, "nickname") => person.nickname = Some(text),
            (POCO_NS, "gender") => person.gender = Some(text),
            (POCO_NS, "note") => person.note = Some(text),
            (POCO_NS, "birthday") => person.birthday = Some(parse_date(&text)?),
            (POCO_NS, "anniversary") => person.anniversary = Some(parse_date(&text)?),
            (POCO_NS, "address") => person.address = Some(parse_address(child)),
            (POCO_NS, "organization") => person.organization = Some(parse_organization(child)?),
            (POCO_NS, "name") => person.extended_name = Some(parse_extended_name(child)),
            (POCO_NS, "account") => person.account = Some(parse_account(child)),
            _ => {}
        }
    }

    Ok(person)
}

fn write_address(writer: &mut XmlWriter, address: &Address) -> ProtocolResult<()> {
    writer.start("poco:address", &[])?;
    for (tag, value) in [
        ("poco:formatted", &address.formatted),
        ("poco:streetAddress", &address.street_address),
        ("poco:locality", &address.locality),
        ("poco:region", &address.region),
        ("poco:postalCode", &address.postal_code),
        ("poco:country", &address.country),
    ] {
        if let Some(value) = value {
            writer.text_element(tag, &[], value)?;
        }
    }
    writer.end("poco:address")
}

fn parse_address(node: Node<'_, '_>) -> Address {
    let mut address = Address::default();

    for child in node.children().filter(Node::is_element) {
        let text = node_text(child);
        match child.tag_name().name() {
            "formatted" => address.formatted = Some(text),
            "streetAddress" => address.street_address = Some(text),
            "locality" => address.locality = Some(text),
            "region" => address.region = Some(text),
            "postalCode" => address.postal_code = Some(text),
            "country" => address.country = Some(text),
            _ => {}
        }
    }

    address
}

fn write_organization(writer: &mut XmlWriter, organization: &Organization) -> ProtocolResult<()> {
    writer.start("poco:organization", &[])?;
    for (tag, value) in [
        ("poco:name", &organization.name),
        ("poco:department", &organization.department),
        ("poco:title", &organization.title),
        ("poco:type", &organization.kind),
    ] {
        if let Some(value) = value {
            writer.text_element(tag, &[], value)?;
        }
    }
    if let Some(start_date) = &organization.start_date {
        writer.text_element("poco:startDate", &[], &format_date(*start_date))?;
    }
    if let Some(end_date) = &organization.end_date {
        writer.text_element("poco:endDate", &[], &format_date(*end_date))?;
    }
    for (tag, value) in [
        ("poco:location", &organization.location),
        ("poco:description", &organization.description),
    ] {
        if let Some(value) = value {
            writer.text_element(tag, &[], value)?;
        }
    }
    writer.end("poco:organization")
}

fn parse_organization(node: Node<'_, '_>) -> ProtocolResult<Organization> {
    let mut organization = Organization::default();

    for child in node.children().filter(Node::is_element) {
        let text = node_text(child);
        match child.tag_name().name() {
            "name" => organization.name = Some(text),
            "department" => organization.department = Some(text),
            "title" => organization.title = Some(text),
            "type" => organization.kind = Some(text),
            "startDate" => organization.start_date = Some(parse_date(&text)?),
            "endDate" => organization.end_date = Some(parse_date(&text)?),
            "location" => organization.location = Some(text),
            "description" => organization.description = Some(text),
            _ => {}
        }
    }

    Ok(organization)
}

fn write_extended_name(writer: &mut XmlWriter, name: &ExtendedName) -> ProtocolResult<()> {
    writer.start("poco:name", &[])?;
    for (tag, value) in [
        ("poco:formatted", &name.formatted),
        ("poco:familyName", &name.family_name),
        ("poco:givenName", &name.given_name),
        ("poco:middleName", &name.middle_name),
        ("poco:honorificPrefix", &name.honorific_prefix),
        ("poco:honorificSuffix", &name.honorific_suffix),
    ] {
        if let Some(value) = value {
            writer.text_element(tag, &[], value)?;
        }
    }
    writer.end("poco:name")
}

fn parse_extended_name(node: Node<'_, '_>) -> ExtendedName {
    let mut name = ExtendedName::default();

    for child in node.children().filter(Node::is_element) {
        let text = node_text(child);
        match child.tag_name().name() {
            "formatted" => name.formatted = Some(text),
            "familyName" => name.family_name = Some(text),
            "givenName" => name.given_name = Some(text),
            "middleName" => name.middle_name = Some(text),
            "honorificPrefix" => name.honorific_prefix = Some(text),
            "honorificSuffix" => name.honorific_suffix = Some(text),
            _ => {}
        }
    }

    name
}

fn write_account(writer: &mut XmlWriter, account: &Account) -> ProtocolResult<()> {
    writer.start("poco:account", &[])?;
    for (tag, value) in [
        ("poco:domain", &account.domain),
        ("poco:username", &account.username),
        ("poco:userid", &account.userid),
    ] {
        if let Some(value) = value {
            writer.text_element(tag, &[], value)?;
        }
    }
    writer.end("poco:account")
}

fn parse_account(node: Node<'_, '_>) -> Account {
    let mut account = Account::default();

    for child in node.children().filter(Node::is_element) {
        let text = node_text(child);
        match child.tag_name().name() {
            "domain" => account.domain = Some(text),
            "username" => account.username = Some(text),
            "userid" => account.userid = Some(text),
            _ => {}
        }
    }

    account
}
