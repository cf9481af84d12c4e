//! Shared test fixtures for the beanport workspace.
//!
//! This crate exists because the same canned statements are consumed by
//! importer unit tests and by CLI integration tests; a `#[cfg(test)]`
//! module in one crate would not be visible to the others.

#![forbid(unsafe_code)]

use camino::Utf8Path;

/// Write a file, creating parent directories as needed. Panics on failure;
/// only ever called from tests.
pub fn write_file(path: &Utf8Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write file");
}

/// A credit-card OFX 1.x (SGML) statement: two transactions and a ledger
/// balance, account id `1234567890123456`, currency USD.
pub const OFX_CREDIT_CARD: &str = "\
OFXHEADER:100
DATA:OFXSGML
VERSION:102
SECURITY:NONE
ENCODING:USASCII
CHARSET:1252
COMPRESSION:NONE
OLDFILEUID:NONE
NEWFILEUID:NONE

<OFX>
<SIGNONMSGSRSV1>
<SONRS>
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<DTSERVER>20210301120000
<LANGUAGE>ENG
</SONRS>
</SIGNONMSGSRSV1>
<CREDITCARDMSGSRSV1>
<CCSTMTTRNRS>
<TRNUID>1
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<CCSTMTRS>
<CURDEF>USD
<CCACCTFROM>
<ACCTID>1234567890123456
</CCACCTFROM>
<BANKTRANLIST>
<DTSTART>20210201000000
<DTEND>20210301000000
<STMTTRN>
<TRNTYPE>DEBIT
<DTPOSTED>20210215120000
<TRNAMT>-25.40
<FITID>202102151
<NAME>COFFEE &amp; BAKERY
<MEMO>CARD PURCHASE
</STMTTRN>
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20210220120000
<TRNAMT>100.00
<FITID>202102201
<NAME>PAYMENT RECEIVED
<MEMO>PAYMENT RECEIVED
</STMTTRN>
</BANKTRANLIST>
<LEDGERBAL>
<BALAMT>-125.40
<DTASOF>20210301000000
</LEDGERBAL>
</CCSTMTRS>
</CCSTMTTRNRS>
</CREDITCARDMSGSRSV1>
</OFX>
";

/// A Schwab checking JSON export with one check and one deposit.
pub const SCHWAB_CHECKING_JSON: &str = r#"{
  "FromDate": "02/01/2021",
  "ToDate": "02/28/2021",
  "StartingBalance": "$1,000.00",
  "EndingBalance": "$2,158.00",
  "PostedTransactions": [
    {
      "Date": "02/03/2021",
      "Type": "CHECK",
      "CheckNumber": "1021",
      "Description": "Check Paid #1021",
      "Withdrawal": "$42.00",
      "Deposit": "",
      "RunningBalance": "$958.00"
    },
    {
      "Date": "02/10/2021",
      "Type": "ACH",
      "CheckNumber": "",
      "Description": "Payroll Direct Dep",
      "Withdrawal": "",
      "Deposit": "$1,200.00",
      "RunningBalance": "$2,158.00"
    }
  ]
}
"#;

/// File name matching the Schwab checking JSON identify rule for
/// account-id pattern `XXXXXX1234`.
pub const SCHWAB_CHECKING_JSON_NAME: &str = "XXXXXX1234_Checking_Transactions_20210301.json";

/// A legacy Schwab checking CSV export: preamble, marker line, header, two
/// posted rows and one pending row without amounts.
pub const SCHWAB_CHECKING_CSV: &str = r#""Transactions for Checking account XXXXXX1234 from 02/01/2021 to 02/28/2021"
"Posted Transactions"
"Date","Type","Check #","Description","Withdrawal (-)","Deposit (+)","Balance"
"02/03/2021","CHECK","1021","CHECK PAID","$42.00","","$958.00"
"02/10/2021","ACH","","PAYROLL DIRECT DEP","","$1,200.00","$2,158.00"
"02/15/2021","VISA","","PENDING HOLD","","",""
"#;

pub const SCHWAB_CHECKING_CSV_NAME: &str = "XXXXXX1234_Checking_Transactions_20210301.CSV";

/// An Apple Card monthly export: two purchases, one installment, one
/// payment.
pub const APPLECARD_CSV: &str = r#"Transaction Date,Clearing Date,Merchant,Category,Description,Amount (USD),Purchased By,Type
03/01/2021,03/02/2021,APPLE.COM/BILL,Other,APPLE.COM/BILL ONE APPLE PARK WAY,9.99,David Ciani,Purchase
03/05/2021,03/06/2021,ACME COFFEE,Restaurants,ACME COFFEE SHOP,4.50,David Ciani,Purchase
03/08/2021,03/09/2021,APPLE ONLINE STORE,Shopping,IPHONE INSTALLMENT,45.79,David Ciani,Installment
03/10/2021,03/10/2021,APPLE CARD PAYMENT,Payment,ACH PAYMENT,-150.00,David Ciani,Payment
"#;

pub const APPLECARD_CSV_NAME: &str = "Apple Card Transactions - March 2021.csv";

/// A Chase activity export with a sale and a deposit.
pub const CHASE_CSV: &str = r#"Transaction Date,Post Date,Description,Category,Type,Amount,Memo
03/01/2021,03/02/2021,STARBUCKS STORE 1234,Food & Drink,Sale,-5.75,
03/03/2021,03/04/2021,PAYROLL DIRECT DEP,Income,ACH Credit,2500.00,
"#;

pub const CHASE_CSV_NAME: &str = "Chase5678_Activity20210201_20210301_20210305.CSV";

/// A pay-stub text extract: header key/values plus the sectioned tables.
/// Columns are separated by runs of two or more spaces, the way PDF text
/// extraction flattens them.
pub const PAYSTUB_TXT: &str = "\
Northrop Grumman Corporation  Pay Statement

Name:  David Ciani  My ID:  12345678  Badge:  987654
Cost Center:  X123  SubArea:  ABC  EE Grp:  1  EE SGrp:  A1
Pay Date:  02/19/2021  Pay Period:  01/30/2021- 02/12/2021 Period No: 04/2021
Hours worked:  80.00

Earnings
DESCRIPTION  CURRENT  YEAR-TO-DATE
Regular Pay  3200.00  12800.00
Overtime  150.00  300.00

Deductions
DESCRIPTION  CURRENT  REMARK  YEAR-TO-DATE
401K Pretax  320.00  16000.00
Medical  75.00  see plan  300.00

Taxes
AUTHORITY  DESCRIPTION  CURRENT  YEAR-TO-DATE
Fed  Withholding Tax  512.00  2048.00
CA  Withholding Tax  160.00  640.00

Distribution of Net Payment
BANK  ACCOUNT  AMOUNT
Schwab Bank  ...1234  2283.00
";

pub const PAYSTUB_TXT_NAME: &str = "paystub-2021-02-19.txt";
