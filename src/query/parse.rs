use bson::{Bson, Document};
use regex::Regex;

use crate::document::eql::compile;
use crate::errors::DocError;
use crate::types::classify;
use crate::utils::json::parse_json_to_bson_document;
use crate::utils::num::{as_f64, js_number_string};

use super::types::{Clause, Condition, Query, Spec};

impl TryFrom<&Document> for Query {
    type Error = DocError;
    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        let clauses = doc
            .iter()
            .map(|(path, value)| Ok(Clause { path: path.clone(), spec: parse_spec(value)? }))
            .collect::<Result<_, DocError>>()?;
        Ok(Self { clauses })
    }
}

/// A document whose first key starts with `$` is an operator object.
pub(crate) fn is_operator_doc(doc: &Document) -> bool {
    doc.keys().next().is_some_and(|k| k.starts_with('$'))
}

/// Parse the right-hand side of a filter entry.
///
/// # Errors
/// Returns an error for unknown operators and malformed operands.
pub fn parse_spec(value: &Bson) -> Result<Spec, DocError> {
    match value {
        Bson::Document(d) if is_operator_doc(d) => Ok(Spec::Conditions(parse_conditions(d)?)),
        other => Ok(Spec::Value(other.clone())),
    }
}

pub(crate) fn parse_conditions(doc: &Document) -> Result<Vec<Condition>, DocError> {
    let options = doc.get("$options");
    let mut out = Vec::with_capacity(doc.len());
    for (key, operand) in doc {
        let cond = match key.as_str() {
            "$ne" => Condition::Ne(operand.clone()),
            "$gt" => Condition::Gt(operand.clone()),
            "$gte" => Condition::Gte(operand.clone()),
            "$lt" => Condition::Lt(operand.clone()),
            "$lte" => Condition::Lte(operand.clone()),
            "$in" => Condition::In(operand.clone()),
            "$nin" => Condition::Nin(operand.clone()),
            "$size" => Condition::Size(operand.clone()),
            "$exists" => Condition::Exists(truthy(operand)),
            "$regex" => Condition::Regex(parse_regex(operand, options)?),
            "$elemMatch" => match operand {
                Bson::Document(q) => Condition::ElemMatch(Query::try_from(q)?),
                other => {
                    return Err(DocError::InvalidOperand(format!(
                        "$elemMatch needs an object, not {}",
                        classify(Some(other))
                    )));
                }
            },
            "$options" => {
                if !doc.contains_key("$regex") {
                    return Err(DocError::InvalidOperand("$options without $regex".into()));
                }
                continue;
            }
            other => return Err(DocError::UnknownOperator(other.to_owned())),
        };
        out.push(cond);
    }
    Ok(out)
}

fn parse_regex(operand: &Bson, options: Option<&Bson>) -> Result<Regex, DocError> {
    let extra = match options {
        None => "",
        Some(Bson::String(s)) => s.as_str(),
        Some(other) => {
            return Err(DocError::InvalidOperand(format!(
                "$options must be a string, not {}",
                classify(Some(other))
            )));
        }
    };
    let re = match operand {
        Bson::String(s) => compile(s, extra)?,
        Bson::RegularExpression(r) => {
            compile(r.pattern.as_str(), &format!("{}{extra}", r.options.as_str()))?
        }
        other => match as_f64(other) {
            Some(f) => compile(&js_number_string(f), extra)?,
            None => {
                return Err(DocError::InvalidOperand(format!(
                    "$regex needs a string, not {}",
                    classify(Some(other))
                )));
            }
        },
    };
    Ok(re)
}

/// JavaScript-style truthiness, used by `$exists`.
pub(crate) fn truthy(v: &Bson) -> bool {
    match v {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(b) => *b,
        Bson::String(s) => !s.is_empty(),
        other => as_f64(other).is_none_or(|f| f != 0.0 && !f.is_nan()),
    }
}

/// # Errors
/// Returns an error if the JSON string is not an object or holds an invalid filter.
pub fn parse_query_json(json: &str) -> Result<Query, DocError> {
    let doc = parse_json_to_bson_document(json)?;
    Query::try_from(&doc)
}
