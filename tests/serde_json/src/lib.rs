use core_json_combinators::{DecodeError, Decoder, DecoderExt, Encoder, EncoderExt, decode, encode};
use serde_json::Value;

/*
  Schemas exercising every combinator against the `serde_json` backend. These are shared by the
  tests and the benches.
*/

#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
  Circle { radius: f64 },
  Rect { width: i64, height: i64 },
}

#[derive(Clone, PartialEq, Debug)]
pub struct Item {
  pub id: i64,
  pub name: String,
  pub tags: Vec<String>,
  pub parent: Option<i64>,
  pub enabled: bool,
  pub shape: Shape,
  pub position: (i64, i64),
  pub labels: Vec<(String, Option<String>)>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Category {
  pub name: String,
  pub children: Vec<Category>,
}

pub fn shape_decoder() -> impl Decoder<Node = Value, Output = Shape> {
  let circle = decode::field("circle", decode::field("radius", decode::float::<Value>()))
    .map(|radius| Shape::Circle { radius });
  let rect = decode::field("rect", decode::pair(decode::int(), decode::int()))
    .map(|(width, height)| Shape::Rect { width, height });
  circle.or(rect)
}

pub fn shape_encoder() -> impl Encoder<Node = Value, Input = Shape> {
  encode::from_fn(|shape: &Shape| -> Value {
    let fields = match shape {
      Shape::Circle { radius } => {
        let radius = encode::entry("radius", &encode::float(), radius);
        encode::entry("circle", &encode::obj(), &vec![radius])
      }
      Shape::Rect { width, height } => {
        encode::entry("rect", &encode::pair(encode::int(), encode::int()), &(*width, *height))
      }
    };
    encode::obj().encode(&vec![fields])
  })
}

pub fn item_decoder() -> impl Decoder<Node = Value, Output = Item> {
  let shape = shape_decoder();
  decode::from_fn(move |node: &Value| {
    Ok(Item {
      id: decode::field("id", decode::int()).decode(node)?,
      name: decode::field("name", decode::string()).decode(node)?,
      tags: decode::field_or("tags", vec![], decode::list(decode::string())).decode(node)?,
      parent: decode::field_opt("parent", decode::int()).decode(node)?,
      enabled: decode::field_or("enabled", true, decode::bool()).decode(node)?,
      shape: decode::field("shape", &shape).decode(node)?,
      position: decode::field("position", decode::pair(decode::int(), decode::int()))
        .decode(node)?,
      labels: decode::field("labels", decode::dict(decode::nullable(decode::string())))
        .decode(node)?,
    })
  })
}

pub fn item_encoder() -> impl Encoder<Node = Value, Input = Item> {
  let shape = shape_encoder();
  encode::obj::<Value>().map(move |item: &Item| {
    vec![
      encode::entry("id", &encode::int(), &item.id),
      encode::entry("name", &encode::string(), &item.name),
      encode::entry("tags", &encode::list(encode::string()), &item.tags),
      encode::entry("parent", &encode::nullable(encode::int()), &item.parent),
      encode::entry("enabled", &encode::bool(), &item.enabled),
      encode::entry("shape", &shape, &item.shape),
      encode::entry("position", &encode::pair(encode::int(), encode::int()), &item.position),
      encode::entry("labels", &encode::dict(encode::nullable(encode::string())), &item.labels),
    ]
  })
}

pub fn decode_category(node: &Value) -> Result<Category, DecodeError> {
  Ok(Category {
    name: decode::field("name", decode::string()).decode(node)?,
    children: decode::field_or("children", vec![], decode::list(decode::from_fn(decode_category)))
      .decode(node)?,
  })
}

pub fn encode_category(category: &Category) -> Value {
  let children = encode::list(encode::from_fn(encode_category));
  encode::obj().encode(&vec![
    encode::entry("name", &encode::string(), &category.name),
    encode::entry("children", &children, &category.children),
  ])
}

#[cfg(test)]
mod tests {
  use rand_core::{RngCore, OsRng};
  use serde_json::json;

  use core_json_combinators::*;
  use super::*;

  #[test]
  fn field_defaulting() {
    let node = json!({ "name": "x" });
    assert_eq!(decode(&decode::field_or("age", 0, decode::int()), &node), Ok(0));

    let error = decode(&decode::field("age", decode::int()), &node).unwrap_err();
    assert_eq!(error, DecodeError::FieldError("age".to_string(), Box::new(DecodeError::NotFound)));
    assert_eq!(error_to_string(&error), r#"field "age": not found"#);

    // Present values are still decoded, and their failures aren't masked by the default
    let node = json!({ "age": "old" });
    assert_eq!(
      decode(&decode::field_or("age", 0, decode::int()), &node).map_err(|e| error_to_string(&e)),
      Err(r#"field "age": expected int"#.to_string())
    );
  }

  #[test]
  fn path_fidelity() {
    let decoder = decode::field("items", decode::list(decode::int::<Value>()));
    let error = parse(&decoder, r#"{"items": [1, "x", 3]}"#).unwrap_err();
    assert_eq!(error_to_string(&error), r#"field "items": element at index 1: expected int"#);
    assert_eq!(
      error.path(),
      vec![PathElement::Field("items".to_string()), PathElement::Index(1)]
    );
    assert_eq!(error.pointer(), "/items/1");
    assert_eq!(error.root_cause(), &DecodeError::expected(Kind::Int));

    let decoder = decode::list(decode::field("tags", decode::list(decode::string::<Value>())));
    let error = parse(&decoder, r#"[{"tags": []}, {"tags": []}, {"tags": {}}]"#).unwrap_err();
    assert_eq!(error.to_string(), r#"element at index 2: field "tags": expected array"#);
  }

  #[derive(PartialEq, Debug)]
  enum IntOrString {
    Int(i64),
    String(String),
  }

  #[test]
  fn alternation() {
    let decoder = decode::int::<Value>()
      .map(IntOrString::Int)
      .or(decode::string().map(IntOrString::String));

    assert_eq!(decode(&decoder, &json!(5)), Ok(IntOrString::Int(5)));
    assert_eq!(decode(&decoder, &json!("hello")), Ok(IntOrString::String("hello".to_string())));

    let error = decode(&decoder, &json!(true)).unwrap_err();
    assert!(matches!(error, DecodeError::OrError(..)));
    let message = error.to_string();
    assert!(message.contains("expected int"));
    assert!(message.contains("expected string"));
  }

  #[test]
  fn null_handling() {
    let decoder = decode::nullable(decode::string::<Value>());
    assert_eq!(decode(&decoder, &Value::Null), Ok(None));
    assert_eq!(decode(&decoder, &json!("x")), Ok(Some("x".to_string())));
    assert_eq!(decode(&decoder, &json!(1)), Err(DecodeError::expected(Kind::String)));

    let encoder = encode::nullable(encode::string::<Value>());
    assert_eq!(encode(&encoder, &None), "null");
    assert_eq!(encode(&encoder, &Some("x".to_string())), r#""x""#);
  }

  #[test]
  fn arity_mismatch() {
    let decoder = decode::pair(decode::int::<Value>(), decode::int());
    assert_eq!(decode(&decoder, &json!([1, 2])), Ok((1, 2)));

    let error = decode(&decoder, &json!([1, 2, 3])).unwrap_err();
    assert!(matches!(error, DecodeError::TypeError { .. }));
    assert_eq!(error.to_string(), "expected pair (found 3 elements)");

    assert_eq!(decode(&decoder, &json!({})), Err(DecodeError::expected(Kind::Array)));
    assert_eq!(
      decode(&decoder, &json!([1, null])).map_err(|e| error_to_string(&e)),
      Err("element at index 1: expected int".to_string())
    );

    let decoder = decode::singleton(decode::string::<Value>());
    assert_eq!(decode(&decoder, &json!(["only"])), Ok("only".to_string()));
    assert_eq!(
      decode(&decoder, &json!(["a", "b"])).map_err(|e| error_to_string(&e)),
      Err("expected singleton (found 2 elements)".to_string())
    );
  }

  #[test]
  fn idempotent_rendering() {
    let error = parse(&item_decoder(), r#"{"id": 1, "name": "a", "shape": {"square": 1}}"#)
      .unwrap_err();
    let rendered = error_to_string(&error);
    assert_eq!(rendered, error_to_string(&error));
    assert_eq!(
      rendered,
      r#"field "shape": either (field "circle": not found) or (field "rect": not found)"#
    );
  }

  #[test]
  fn numbers() {
    assert_eq!(decode(&decode::float(), &json!(3)).map(f64::to_bits), Ok(3f64.to_bits()));
    assert_eq!(decode(&decode::int(), &json!(3.5)), Err(DecodeError::expected(Kind::Int)));
    assert_eq!(decode(&decode::int(), &json!(u64::MAX)), Err(DecodeError::expected(Kind::Int)));
    assert_eq!(decode(&decode::float(), &json!("3")), Err(DecodeError::expected(Kind::Float)));

    assert_eq!(encode(&encode::float::<Value>(), &1.5), "1.5");
    assert_eq!(encode(&encode::float::<Value>(), &f64::NAN), "null");
    assert_eq!(encode(&encode::int::<Value>(), &i64::MIN), i64::MIN.to_string());

    let ints = vec![3, -1, 2].into_boxed_slice();
    let text = encode(&encode::array(encode::int::<Value>()), &ints);
    assert_eq!(text, "[3,-1,2]");
    assert_eq!(parse(&decode::array(decode::int::<Value>()), &text), Ok(ints));
  }

  #[test]
  fn predicates() {
    let node = json!([null, true, 1, 1.5, "s", [], {}]);
    let items = decode(&decode::list(decode::json::<Value>()), &node).unwrap();
    assert_eq!(
      items.iter().map(DecodeNode::kind).collect::<Vec<_>>(),
      vec![
        Kind::Null,
        Kind::Bool,
        Kind::Int,
        Kind::Float,
        Kind::String,
        Kind::Array,
        Kind::Object
      ]
    );
    assert!(is_null(&node[0]));
    assert!(is_bool(&node[1]));
    assert!(is_int(&node[2]));
    assert!(is_float(&node[3]));
    assert!(is_string(&node[4]));
    assert!(is_array(&node[5]));
    assert!(is_obj(&node[6]));
    assert!(!is_obj(&node[5]));
  }

  #[test]
  fn objects() {
    let node = json!({ "b": 1, "a": 2, "c": "x" });
    assert_eq!(
      decode(&decode::obj(), &node),
      Ok(vec![
        ("b".to_string(), json!(1)),
        ("a".to_string(), json!(2)),
        ("c".to_string(), json!("x")),
      ])
    );
    assert_eq!(
      decode(&decode::dict(decode::int()), &node).map_err(|e| error_to_string(&e)),
      Err(r#"field "c": expected int"#.to_string())
    );
    assert_eq!(decode(&decode::dict(decode::ignore()), &node).map(|fields| fields.len()), Ok(3));
    assert_eq!(decode(&decode::obj(), &json!([])), Err(DecodeError::expected(Kind::Object)));
    assert_eq!(
      decode(&decode::field("a", decode::int()), &json!([])),
      Err(DecodeError::expected(Kind::Object))
    );

    let encoder = encode::dict(encode::int::<Value>());
    let fields = vec![("z".to_string(), 1), ("y".to_string(), 2)];
    assert_eq!(encode(&encoder, &fields), r#"{"z":1,"y":2}"#);
    assert_eq!(decode(&decode::dict(decode::int()), &encoder.encode(&fields)), Ok(fields));
  }

  #[test]
  fn nested() {
    let node = json!({ "a": { "b": { "c": [1, 2] } } });
    let decoder = decode::at(["a", "b", "c"], decode::array(decode::int()));
    assert_eq!(decode(&decoder, &node).map(Vec::from), Ok(vec![1, 2]));
    let decoder = decode::at(["a", "b", "d"], decode::array(decode::int()));
    assert_eq!(decode(&decoder, &node).unwrap_err().pointer(), "/a/b/d");
  }

  #[test]
  fn validation() {
    let port = decode::int::<Value>().try_map(u16::try_from);
    assert_eq!(decode(&port, &json!(8080)), Ok(8080));
    let error = decode(&port, &json!(-1)).unwrap_err();
    assert!(matches!(error, DecodeError::ValidationError(Some(_))));

    let even = decode::int::<Value>().map_option(|n| (n % 2 == 0).then_some(n));
    assert_eq!(decode(&even, &json!(4)), Ok(4));
    assert_eq!(
      decode(&decode::field("n", even), &json!({ "n": 3 })).map_err(|e| error_to_string(&e)),
      Err(r#"field "n": invalid value"#.to_string())
    );
  }

  #[test]
  fn backend_errors() {
    let error = parse(&decode::int::<Value>(), "{").unwrap_err();
    let expected = serde_json::from_str::<Value>("{").unwrap_err().to_string();
    assert_eq!(error, DecodeError::BackendError(expected.clone()));
    assert_eq!(error.to_string(), format!("parse error: {expected}"));
  }

  #[test]
  #[should_panic(expected = r#"field "id": expected int"#)]
  fn parse_or_fail_aborts() {
    parse_or_fail(&item_decoder(), r#"{"id": "1"}"#);
  }

  #[test]
  fn or_fail_succeeds() {
    assert_eq!(parse_or_fail(&decode::list(decode::bool::<Value>()), "[true]"), vec![true]);
    decode_or_fail(&decode::null(), &Value::Null);
  }

  #[test]
  fn recursion() {
    let category = Category {
      name: "root".to_string(),
      children: vec![
        Category { name: "a".to_string(), children: vec![] },
        Category {
          name: "b".to_string(),
          children: vec![Category { name: "c".to_string(), children: vec![] }],
        },
      ],
    };
    let decoder = decode::from_fn(decode_category);
    assert_eq!(parse(&decoder, &encode_category(&category).to_string()), Ok(category));

    let error = parse(
      &decoder,
      r#"{"name": "root", "children": [{"name": "a", "children": [{"name": 1}]}]}"#,
    )
    .unwrap_err();
    assert_eq!(
      error.to_string(),
      r#"field "children": element at index 0: field "children": element at index 0: field "name": expected string"#
    );
  }

  #[test]
  fn boxed() {
    let decoders: Vec<decode::BoxDecoder<'_, Value, i64>> = vec![
      decode::int().boxed(),
      decode::string().try_map(|s: String| s.parse::<i64>()).boxed(),
      decode::succeed(0).boxed(),
    ];
    for decoder in &decoders {
      assert_eq!(decode(decoder, &json!(0)).or_else(|_| decode(decoder, &json!("0"))), Ok(0));
    }

    let encoder: encode::BoxEncoder<'_, Value, i64> = encode::int().boxed();
    assert_eq!(encode(&encoder, &7), "7");
  }

  #[allow(clippy::cast_possible_truncation)]
  fn random_string() -> String {
    let mut res = String::new();
    for _ in 0 .. (OsRng.next_u64() % 32) {
      if (OsRng.next_u64() % 2) == 1 {
        // ASCII
        res.push(char::from_u32((OsRng.next_u64() % 128) as u32).unwrap());
      } else {
        res.push(loop {
          if let Some(char) = char::from_u32(OsRng.next_u64() as u32) {
            break char;
          }
        });
      }
    }
    res
  }

  fn random_i64() -> i64 {
    let mut bytes = [0; 8];
    OsRng.fill_bytes(&mut bytes);
    i64::from_le_bytes(bytes)
  }

  fn random_f64() -> f64 {
    loop {
      let float = f64::from_bits(OsRng.next_u64());
      if float.is_finite() {
        break float;
      }
    }
  }

  fn random_item() -> Item {
    Item {
      id: random_i64(),
      name: random_string(),
      tags: (0 .. (OsRng.next_u64() % 4)).map(|_| random_string()).collect(),
      parent: ((OsRng.next_u64() % 2) == 1).then(random_i64),
      enabled: (OsRng.next_u64() % 2) == 1,
      shape: if (OsRng.next_u64() % 2) == 1 {
        Shape::Circle { radius: random_f64() }
      } else {
        Shape::Rect { width: random_i64(), height: random_i64() }
      },
      position: (random_i64(), random_i64()),
      labels: (0 .. (OsRng.next_u64() % 4))
        // Use the index as a prefix so names are unique
        .map(|i| {
          let value = ((OsRng.next_u64() % 2) == 1).then(random_string);
          (format!("{i}{}", random_string()), value)
        })
        .collect(),
    }
  }

  fn random_value(depth: usize) -> Value {
    let modulus = if depth == 4 { 4 } else { 6 };
    match OsRng.next_u64() % modulus {
      0 => Value::Null,
      1 => Value::Bool((OsRng.next_u64() % 2) == 1),
      2 => {
        if (OsRng.next_u64() % 2) == 1 {
          Value::from(random_i64())
        } else {
          Value::from(random_f64())
        }
      }
      3 => Value::String(random_string()),
      4 => Value::Array((0 .. (OsRng.next_u64() % 6)).map(|_| random_value(depth + 1)).collect()),
      5 => Value::Object(
        (0 .. (OsRng.next_u64() % 6)).map(|_| (random_string(), random_value(depth + 1))).collect(),
      ),
      _ => unreachable!(),
    }
  }

  #[test]
  fn fuzz_round_trip() {
    let decoder = item_decoder();
    let encoder = item_encoder();
    for _ in 0 .. 100 {
      let item = random_item();

      // Through the node
      assert_eq!(decode(&decoder, &encoder.encode(&item)), Ok(item.clone()));

      // Through the text, with `serde_json` as the parser and printer
      let text = encode(&encoder, &item);
      assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), encoder.encode(&item));
      assert_eq!(parse(&decoder, &text), Ok(item));
    }
  }

  #[test]
  fn fuzz_passthrough() {
    for _ in 0 .. 100 {
      let value = random_value(0);
      assert_eq!(decode(&decode::json(), &value), Ok(value.clone()));
      assert_eq!(parse(&decode::json(), &encode(&encode::json(), &value)), Ok(value.clone()));

      if let Value::Object(map) = &value {
        let fields = decode(&decode::obj(), &value).unwrap();
        assert!(fields.iter().map(|(name, value)| (name, value)).eq(map.iter()));
        assert_eq!(encode::obj().encode(&fields), value);
      }
      if let Value::Array(items) = &value {
        assert_eq!(decode(&decode::list(decode::json()), &value).as_ref(), Ok(items));
      }
    }
  }
}
