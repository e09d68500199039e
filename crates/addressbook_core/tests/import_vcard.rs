use addressbook_core::db::open_db_in_memory;
use addressbook_core::{AddressBookService, ExchangeFormat, SqliteContactRepository};
use std::fs;

const PHONE_EXPORT: &str = concat!(
    "BEGIN:VCARD\r\n",
    "VERSION:2.1\r\n",
    "N;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:M=C3=BCller;J=C3=BCrgen;;;\r\n",
    "FN;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:J=C3=BCrgen M=C3=BCller\r\n",
    "TEL;CELL:+49 171 1234567\r\n",
    "TEL;HOME;VOICE:030 123456\r\n",
    "EMAIL;INTERNET:juergen@example.com\r\n",
    "ADR;HOME;ENCODING=QUOTED-PRINTABLE:;;Hauptstra=C3=9Fe 5;Berlin;;10115;=\r\n",
    "Germany\r\n",
    "END:VCARD\r\n",
    "BEGIN:VCARD\r\n",
    "VERSION:3.0\r\n",
    "N:Beispiel;Ben;;;\r\n",
    "FN:Ben Beispiel\r\n",
    "item1.EMAIL;TYPE=INTERNET,HOME:ben@example.com\r\n",
    "item1.X-ABLabel:private\r\n",
    "BDAY:1990-04-01\r\n",
    "URL:https://ben.exa\r\n",
    " mple.com\r\n",
    "END:VCARD\r\n",
);

#[test]
fn phone_export_maps_every_known_property() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phone.vcf");
    fs::write(&path, PHONE_EXPORT).unwrap();

    let report = service.import(&path, ExchangeFormat::Vcard).unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 0);
    let contacts = service.list();

    let juergen = &contacts[0];
    assert_eq!(juergen.fields.first_name, "Jürgen");
    assert_eq!(juergen.fields.last_name, "Müller");
    assert_eq!(juergen.fields.full_name, "");
    assert_eq!(juergen.fields.mobile, "+49 171 1234567");
    assert_eq!(juergen.fields.phone, "030 123456");
    assert_eq!(juergen.fields.email, "juergen@example.com");
    assert_eq!(juergen.fields.address, "Hauptstraße 5");
    assert_eq!(juergen.fields.city, "Berlin");
    assert_eq!(juergen.fields.postal_code, "10115");

    let ben = &contacts[1];
    assert_eq!(ben.display_name(), "Ben Beispiel");
    assert_eq!(ben.fields.email, "ben@example.com");
    assert_eq!(ben.fields.birthday, "1990-04-01");
    assert_eq!(ben.fields.website, "https://ben.example.com");
}

#[test]
fn escaped_text_is_unescaped() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("escaped.vcf");
    fs::write(
        &path,
        "BEGIN:VCARD\nVERSION:3.0\nN:Meyer\\, Sr.;Hans;;;\nFN:Hans Meyer\\, Sr.\nADR:;;Weg 1\\; Hinterhaus;Köln;;50667;\nEND:VCARD\n",
    )
    .unwrap();

    service.import(&path, ExchangeFormat::Vcard).unwrap();

    let hans = &service.list()[0];
    assert_eq!(hans.fields.last_name, "Meyer, Sr.");
    assert_eq!(hans.fields.first_name, "Hans");
    assert_eq!(hans.fields.full_name, "");
    assert_eq!(hans.fields.address, "Weg 1; Hinterhaus");
    assert_eq!(hans.fields.city, "Köln");
}

#[test]
fn vcard_reimport_merges_by_email() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let first = dir.path().join("first.vcf");
    fs::write(
        &first,
        "BEGIN:VCARD\nN:Muster;Anna;;;\nEMAIL:anna@x.de\nEND:VCARD\n",
    )
    .unwrap();
    service.import(&first, ExchangeFormat::Vcard).unwrap();
    let id = service.list()[0].id;

    let second = dir.path().join("second.vcf");
    fs::write(
        &second,
        "BEGIN:VCARD\nEMAIL:Anna@X.de\nTEL;TYPE=CELL:0171 999\nEND:VCARD\n",
    )
    .unwrap();
    let report = service.import(&second, ExchangeFormat::Vcard).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(service.list().len(), 1);
    let anna = service.get(id).unwrap();
    assert_eq!(anna.fields.first_name, "Anna");
    assert_eq!(anna.fields.mobile, "0171 999");
}

#[test]
fn truncated_file_keeps_complete_records_and_counts_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.vcf");
    fs::write(
        &path,
        "BEGIN:VCARD\nN:Muster;Anna;;;\nEND:VCARD\nBEGIN:VCARD\nN:Beispiel;Ben;;;\n",
    )
    .unwrap();

    let report = service.import(&path, ExchangeFormat::Vcard).unwrap();

    assert_eq!(report.added, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(service.list()[0].fields.first_name, "Anna");
}

#[test]
fn file_without_cards_imports_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let mut service = AddressBookService::open(repo).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.vcf");
    fs::write(&path, "just some text\n").unwrap();

    let report = service.import(&path, ExchangeFormat::Vcard).unwrap();

    assert_eq!(report.imported(), 0);
    assert_eq!(report.skipped, 0);
    assert!(service.list().is_empty());
}
