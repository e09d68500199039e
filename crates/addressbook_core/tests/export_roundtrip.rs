use addressbook_core::db::open_db_in_memory;
use addressbook_core::{
    AddressBookService, ContactFields, ExchangeFormat, ExportError, SearchQuery,
    SqliteContactRepository,
};
use rusqlite::Connection;
use std::fs;

fn sample_contacts() -> Vec<ContactFields> {
    vec![
        ContactFields {
            first_name: "Anna".to_string(),
            last_name: "Muster".to_string(),
            email: "anna@x.de".to_string(),
            phone: "030 123456".to_string(),
            mobile: "0171 1234567".to_string(),
            address: "Hauptstraße 5; Hinterhaus".to_string(),
            postal_code: "10115".to_string(),
            city: "Berlin".to_string(),
            birthday: "1985-02-14".to_string(),
            website: "https://anna.example.com".to_string(),
            ..ContactFields::default()
        },
        ContactFields {
            full_name: "Dr. Ben Beispiel, MBA".to_string(),
            first_name: "Ben".to_string(),
            last_name: "Beispiel".to_string(),
            email: "ben@x.de".to_string(),
            ..ContactFields::default()
        },
        ContactFields {
            full_name: "Muster GmbH".to_string(),
            phone: "089 555".to_string(),
            ..ContactFields::default()
        },
        ContactFields {
            email: "only-mail@x.de".to_string(),
            ..ContactFields::default()
        },
    ]
}

fn service_with_samples(conn: &Connection) -> AddressBookService<SqliteContactRepository<'_>> {
    service_with(conn, sample_contacts())
}

fn service_with(
    conn: &Connection,
    contacts: Vec<ContactFields>,
) -> AddressBookService<SqliteContactRepository<'_>> {
    let repo = SqliteContactRepository::try_new(conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    for fields in contacts {
        service.create(fields).unwrap();
    }
    service
}

fn fields_of(service: &AddressBookService<SqliteContactRepository<'_>>) -> Vec<ContactFields> {
    service
        .list()
        .iter()
        .map(|contact| contact.fields.clone())
        .collect()
}

fn assert_roundtrip(format: ExchangeFormat, file_name: &str) {
    assert_roundtrip_of(sample_contacts(), format, file_name);
}

fn assert_roundtrip_of(contacts: Vec<ContactFields>, format: ExchangeFormat, file_name: &str) {
    let count = contacts.len();
    let source_conn = open_db_in_memory().unwrap();
    let source = service_with(&source_conn, contacts);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);

    let exported = source.export(&path, format).unwrap();
    assert_eq!(exported, count);

    let target_conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&target_conn).unwrap();
    let mut target = AddressBookService::open(repo).unwrap();
    let report = target.import(&path, format).unwrap();

    assert_eq!(report.added, count);
    assert_eq!(report.skipped, 0);
    assert_eq!(fields_of(&target), fields_of(&source));
}

#[test]
fn csv_export_reimports_to_equal_fields() {
    assert_roundtrip(ExchangeFormat::Csv, "adressbuch.csv");
}

#[test]
fn vcard_export_reimports_to_equal_fields() {
    assert_roundtrip(ExchangeFormat::Vcard, "adressbuch.vcf");
}

fn name_edge_cases() -> Vec<ContactFields> {
    vec![
        // Explicit full name identical to "first last".
        ContactFields {
            full_name: "Anna Meyer".to_string(),
            first_name: "Anna".to_string(),
            last_name: "Meyer".to_string(),
            ..ContactFields::default()
        },
        // Inner whitespace must not produce a full name on the way back.
        ContactFields {
            first_name: "Anna  Maria".to_string(),
            last_name: "Meyer".to_string(),
            ..ContactFields::default()
        },
        ContactFields {
            full_name: "Meyer".to_string(),
            last_name: "Meyer".to_string(),
            ..ContactFields::default()
        },
    ]
}

#[test]
fn vcard_roundtrip_keeps_names_exactly() {
    assert_roundtrip_of(name_edge_cases(), ExchangeFormat::Vcard, "names.vcf");

    let conn = open_db_in_memory().unwrap();
    let service = service_with(&conn, name_edge_cases());
    let text = service.export_to_string(ExchangeFormat::Vcard).unwrap();
    assert!(text.contains("X-ADDRESSBOOK-FULL-NAME:Anna Meyer\r\n"));
    assert!(text.contains("FN:Anna  Maria Meyer\r\n"));
}

#[test]
fn csv_roundtrip_keeps_names_exactly() {
    assert_roundtrip_of(name_edge_cases(), ExchangeFormat::Csv, "names.csv");
}

#[test]
fn csv_export_uses_semicolons_and_canonical_header() {
    let conn = open_db_in_memory().unwrap();
    let service = service_with_samples(&conn);

    let text = service.export_to_string(ExchangeFormat::Csv).unwrap();
    let mut lines = text.lines();

    assert_eq!(
        lines.next().unwrap(),
        "full_name;first_name;last_name;email;phone;mobile;address;postal_code;city;birthday;website"
    );
    assert!(text.contains("\"Hauptstraße 5; Hinterhaus\""));
    assert_eq!(text.lines().count(), 5);
}

#[test]
fn vcard_export_writes_one_record_per_contact() {
    let conn = open_db_in_memory().unwrap();
    let service = service_with_samples(&conn);

    let text = service.export_to_string(ExchangeFormat::Vcard).unwrap();

    assert_eq!(text.matches("BEGIN:VCARD\r\n").count(), 4);
    assert_eq!(text.matches("END:VCARD\r\n").count(), 4);
    assert!(text.contains("FN:Dr. Ben Beispiel\\, MBA\r\n"));
    assert!(text.contains("FN:Anna Muster\r\n"));
    assert!(text.contains("TEL;TYPE=CELL:0171 1234567\r\n"));
}

#[test]
fn export_does_not_mutate_store() {
    let conn = open_db_in_memory().unwrap();
    let service = service_with_samples(&conn);
    let before = fields_of(&service);
    let dir = tempfile::tempdir().unwrap();

    service
        .export(dir.path().join("out.csv"), ExchangeFormat::Csv)
        .unwrap();
    service
        .export(dir.path().join("out.vcf"), ExchangeFormat::Vcard)
        .unwrap();

    assert_eq!(fields_of(&service), before);
}

#[test]
fn empty_store_exports_header_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let service = AddressBookService::open(repo).unwrap();

    let csv = service.export_to_string(ExchangeFormat::Csv).unwrap();
    let vcard = service.export_to_string(ExchangeFormat::Vcard).unwrap();

    assert_eq!(csv.lines().count(), 1);
    assert!(vcard.is_empty());
}

#[test]
fn export_to_missing_directory_reports_unwritable() {
    let conn = open_db_in_memory().unwrap();
    let service = service_with_samples(&conn);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");

    let err = service.export(&path, ExchangeFormat::Csv).unwrap_err();

    match err {
        ExportError::FileUnwritable { path: failed, .. } => assert_eq!(failed, path),
    }
    assert!(!path.exists());
}

#[test]
fn export_replaces_existing_file() {
    let conn = open_db_in_memory().unwrap();
    let service = service_with_samples(&conn);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.vcf");
    fs::write(&path, "stale content that must disappear").unwrap();

    service.export(&path, ExchangeFormat::Vcard).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert!(text.starts_with("BEGIN:VCARD"));
}

#[test]
fn deleted_contact_is_absent_from_search_and_export() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service_with_samples(&conn);
    let ben = service.search(&SearchQuery::new("ben@x"))[0].id;

    assert!(service.delete(ben).unwrap());

    assert!(service.search(&SearchQuery::new("Beispiel")).is_empty());
    let text = service.export_to_string(ExchangeFormat::Vcard).unwrap();
    assert!(!text.contains("ben@x.de"));
}
