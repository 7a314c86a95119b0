use fieldweave_fields::{
    AccessError, ColumnSet, FieldType, FieldValue, FieldsContext, FieldsError, MetadataAccess,
    OrderBy, RecordAccess, RecordStore, RelatedQuery,
};
use rstest::rstest;
use tempfile::TempDir;
use uuid::Uuid;

const ACCOUNT_ID: &str = "2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11";
const USER_ID: &str = "6f9619ff-8b86-d011-b42d-00c04fc964ff";

const DATASET: &str = r#"
current_user:
  entity: systemuser
  id: 6f9619ff-8b86-d011-b42d-00c04fc964ff
url_base: https://crm.example.com
records:
  - entity: systemuser
    id: 6f9619ff-8b86-d011-b42d-00c04fc964ff
    fields:
      fullname: { kind: text, value: Jo }
  - entity: account
    id: 2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11
    fields:
      name: { kind: text, value: Acme }
      revenue: { kind: money, value: "1250.5" }
      industrycode: { kind: option-set, value: 3 }
      ownerid:
        kind: reference
        value: { entity: systemuser, id: 6f9619ff-8b86-d011-b42d-00c04fc964ff, name: Jo }
      fax: { kind: empty }
  - entity: contact
    id: 0e3c7b1a-5a71-4c38-9b0e-2f1b0a6c4d01
    fields:
      fullname: { kind: text, value: Zed }
      parentcustomerid:
        kind: reference
        value: { entity: account, id: 2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11 }
  - entity: contact
    id: 0e3c7b1a-5a71-4c38-9b0e-2f1b0a6c4d02
    fields:
      fullname: { kind: text, value: Ann }
      statecode: { kind: option-set, value: 1 }
      parentcustomerid:
        kind: reference
        value: { entity: account, id: 2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11 }
"#;

const ACCOUNT_DEF: &str = r#"
name: account
primary_field: name
fields:
  - name: name
    type: { kind: text }
  - name: industrycode
    type:
      kind: select
      options:
        - { value: 1, label: Agriculture }
        - { value: 3, label: Consulting }
  - name: ownerid
    type: { kind: reference, entity: systemuser }
"#;

fn id(text: &str) -> Uuid {
    Uuid::parse_str(text).unwrap()
}

#[tokio::test]
async fn dataset_round_trips_through_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.yaml");
    std::fs::write(&path, DATASET).unwrap();

    let store = RecordStore::load(&path).await.unwrap();
    assert_eq!(store.len(), 4);

    let account = store
        .retrieve("account", &id(ACCOUNT_ID), &ColumnSet::All)
        .unwrap();
    assert_eq!(account.get("name"), Some(&FieldValue::from("Acme")));
    assert_eq!(account.get("fax"), Some(&FieldValue::Null));
    assert_eq!(account.get("industrycode"), Some(&FieldValue::OptionSet(3)));
    let owner = account.get("ownerid").and_then(|v| v.as_reference()).unwrap();
    assert_eq!(owner.name.as_deref(), Some("Jo"));

    assert_eq!(store.who_am_i().unwrap().id, id(USER_ID));
    assert!(store
        .record_url(owner)
        .unwrap()
        .starts_with("https://crm.example.com/main.aspx?etn=systemuser"));
}

#[rstest]
#[case(true, vec!["Zed"])]
#[case(false, vec!["Ann", "Zed"])]
fn related_contacts(#[case] active_only: bool, #[case] expected: Vec<&str>) {
    let store = RecordStore::from_yaml_str(DATASET).unwrap();
    let account = store
        .retrieve("account", &id(ACCOUNT_ID), &ColumnSet::All)
        .unwrap();
    let related = store
        .retrieve_related(
            &account,
            &RelatedQuery {
                child_entity: "contact".into(),
                relation_field: "parentcustomerid".into(),
                active_only,
                order: vec![OrderBy::ascending("fullname")],
                columns: ColumnSet::single("fullname"),
            },
        )
        .unwrap();
    let names: Vec<String> = related
        .iter()
        .map(|r| r.get("fullname").unwrap().raw_string())
        .collect();
    assert_eq!(names, expected);
    assert!(related.iter().all(|r| r.fields.len() == 1));
}

#[test]
fn missing_record_is_not_found() {
    let store = RecordStore::from_yaml_str(DATASET).unwrap();
    let err = store
        .retrieve("account", &Uuid::nil(), &ColumnSet::All)
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::NotFound {
            entity: "account".into(),
            id: Uuid::nil()
        }
    );
}

#[tokio::test]
async fn metadata_directory_feeds_lookups() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("account.yaml"), ACCOUNT_DEF).unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "name: [unterminated").unwrap();

    let context = FieldsContext::open(dir.path()).build().await.unwrap();
    assert_eq!(context.all_entities().len(), 1);
    assert_eq!(context.primary_field("account").as_deref(), Some("name"));

    let industry = context.field_metadata("account", "industrycode").unwrap();
    assert_eq!(industry.type_.option_label(3), Some("Consulting"));
    assert!(matches!(
        context.field_metadata("account", "ownerid").unwrap().type_,
        FieldType::Reference { .. }
    ));
    assert!(context.field_metadata("contact", "fullname").is_none());
}

#[tokio::test]
async fn metadata_directory_must_exist() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let err = FieldsContext::open(&missing).build().await.unwrap_err();
    assert!(matches!(err, FieldsError::NotInitialized { .. }));
}
