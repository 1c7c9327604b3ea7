use bson::{Bson, Document};

use crate::errors::DocError;
use crate::types::classify;
use crate::utils::json::parse_json_to_bson_document;

use super::types::{Modifier, ModifierGroup, UpdateSpec};

impl TryFrom<&Document> for UpdateSpec {
    type Error = DocError;
    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let mut out = Self::default();
        for (name, value) in doc {
            let Some(modifier) = Modifier::from_name(name) else {
                log::debug!("skipping unknown modifier \"{name}\"");
                continue;
            };
            let Bson::Document(fields) = value else {
                return Err(DocError::TypeMismatch(format!(
                    "{modifier} needs an object of fields, not {}",
                    classify(Some(value))
                )));
            };
            out.groups.push(ModifierGroup {
                modifier,
                fields: fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            });
        }
        Ok(out)
    }
}

/// # Errors
/// Returns an error if the JSON string is not an object or holds a malformed update.
pub fn parse_update_json(json: &str) -> Result<UpdateSpec, DocError> {
    let doc = parse_json_to_bson_document(json)?;
    UpdateSpec::try_from(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn groups_keep_document_order() {
        let spec = UpdateSpec::try_from(&doc! {
            "$inc": {"a": 1},
            "$set": {"b": 2, "c": 3},
        })
        .unwrap();
        let mods: Vec<_> = spec.groups.iter().map(|g| g.modifier).collect();
        assert_eq!(mods, [Modifier::Inc, Modifier::Set]);
        assert_eq!(spec.groups[1].fields[1].0, "c");
    }

    #[test]
    fn unknown_modifiers_are_skipped() {
        let spec = UpdateSpec::try_from(&doc! {"$mul": {"a": 2}, "plain": 1}).unwrap();
        assert!(spec.groups.is_empty());
    }

    #[test]
    fn modifier_values_must_be_objects() {
        let e = UpdateSpec::try_from(&doc! {"$set": 5}).unwrap_err();
        assert!(matches!(e, DocError::TypeMismatch(_)));
    }

    #[test]
    fn json_updates_parse() {
        let spec = parse_update_json(r#"{"$pull": {"fruits": {"$in": ["apples"]}}}"#).unwrap();
        assert_eq!(spec.groups[0].modifier, Modifier::Pull);
    }
}
