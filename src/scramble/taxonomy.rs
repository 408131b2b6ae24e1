use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};

/// How a fact takes part in a generated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Randomized directly from its original value.
    Independent,
    /// Recomputed from independent values of the same period.
    Dependent,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Independent => "Independent (Randomized)",
            Role::Dependent => "Dependent (Calculated)",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Cash-flow statement concepts the randomizer understands.
///
/// Tags outside this table are randomized like independent values but never
/// feed a total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Serialize, Deserialize,
)]
pub enum Concept {
    // Operating activities
    NetIncome,
    Depreciation,
    ShareBasedCompensation,
    DeferredIncomeTax,
    OtherNoncash,
    AccountsReceivableChange,
    InventoriesChange,
    OtherReceivablesChange,
    OtherOperatingAssetsChange,
    AccountsPayableChange,
    DeferredRevenueChange,
    OtherOperatingLiabilitiesChange,

    // Investing activities
    PaymentsForSecurities,
    ProceedsFromSecuritiesSales,
    ProceedsFromMaturities,
    CapitalExpenditure,
    Acquisitions,
    OtherInvesting,

    // Financing activities
    DebtProceeds,
    DebtRepayments,
    ShareRepurchases,
    Dividends,
    TaxWithholding,
    CommercialPaper,
    OtherFinancing,

    /// Reported twice per period: beginning balance first, ending balance last.
    CashBalance,

    // Totals
    OperatingTotal,
    InvestingTotal,
    FinancingTotal,
    CashChange,
}

impl Concept {
    pub fn tag(&self) -> &'static str {
        match self {
            Concept::NetIncome => "us-gaap:NetIncomeLoss",
            Concept::Depreciation => "us-gaap:DepreciationDepletionAndAmortization",
            Concept::ShareBasedCompensation => "us-gaap:ShareBasedCompensation",
            Concept::DeferredIncomeTax => "us-gaap:DeferredIncomeTaxExpenseBenefit",
            Concept::OtherNoncash => "us-gaap:OtherNoncashIncomeExpense",
            Concept::AccountsReceivableChange => "us-gaap:IncreaseDecreaseInAccountsReceivable",
            Concept::InventoriesChange => "us-gaap:IncreaseDecreaseInInventories",
            Concept::OtherReceivablesChange => "us-gaap:IncreaseDecreaseInOtherReceivables",
            Concept::OtherOperatingAssetsChange => "us-gaap:IncreaseDecreaseInOtherOperatingAssets",
            Concept::AccountsPayableChange => "us-gaap:IncreaseDecreaseInAccountsPayable",
            Concept::DeferredRevenueChange => {
                "us-gaap:IncreaseDecreaseInContractWithCustomerLiability"
            }
            Concept::OtherOperatingLiabilitiesChange => {
                "us-gaap:IncreaseDecreaseInOtherOperatingLiabilities"
            }
            Concept::PaymentsForSecurities => {
                "us-gaap:PaymentsToAcquireAvailableForSaleSecuritiesDebt"
            }
            Concept::ProceedsFromSecuritiesSales => {
                "us-gaap:ProceedsFromSaleOfAvailableForSaleSecuritiesDebt"
            }
            Concept::ProceedsFromMaturities => {
                "us-gaap:ProceedsFromMaturitiesPrepaymentsAndCallsOfAvailableForSaleSecurities"
            }
            Concept::CapitalExpenditure => "us-gaap:PaymentsToAcquirePropertyPlantAndEquipment",
            Concept::Acquisitions => "us-gaap:PaymentsToAcquireBusinessesNetOfCashAcquired",
            Concept::OtherInvesting => "us-gaap:PaymentsForProceedsFromOtherInvestingActivities",
            Concept::DebtProceeds => "us-gaap:ProceedsFromIssuanceOfLongTermDebt",
            Concept::DebtRepayments => "us-gaap:RepaymentsOfLongTermDebt",
            Concept::ShareRepurchases => "us-gaap:PaymentsForRepurchaseOfCommonStock",
            Concept::Dividends => "us-gaap:PaymentsOfDividends",
            Concept::TaxWithholding => {
                "us-gaap:PaymentsRelatedToTaxWithholdingForShareBasedCompensation"
            }
            Concept::CommercialPaper => "us-gaap:ProceedsFromRepaymentsOfCommercialPaper",
            Concept::OtherFinancing => "us-gaap:ProceedsFromPaymentsForOtherFinancingActivities",
            Concept::CashBalance => {
                "us-gaap:CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents"
            }
            Concept::OperatingTotal => "us-gaap:NetCashProvidedByUsedInOperatingActivities",
            Concept::InvestingTotal => "us-gaap:NetCashProvidedByUsedInInvestingActivities",
            Concept::FinancingTotal => "us-gaap:NetCashProvidedByUsedInFinancingActivities",
            Concept::CashChange => concat!(
                "us-gaap:CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
                "PeriodIncreaseDecreaseIncludingExchangeRateEffect"
            ),
        }
    }

    pub fn from_tag(tag: &str) -> Option<Concept> {
        Concept::iter().find(|concept| concept.tag() == tag)
    }

    /// Role of the first occurrences of a tag. For `CashBalance` the trailing
    /// (ending) occurrences are reassigned to `Dependent` during extraction.
    pub fn role(&self) -> Role {
        match self {
            Concept::OperatingTotal
            | Concept::InvestingTotal
            | Concept::FinancingTotal
            | Concept::CashChange => Role::Dependent,
            _ => Role::Independent,
        }
    }

    pub fn is_balance(&self) -> bool {
        matches!(self, Concept::CashBalance)
    }

    pub fn local_name(&self) -> &'static str {
        local_name(self.tag())
    }
}

pub fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

/// `Role` for any tag, defaulting unknown tags to `Independent`.
pub fn classify(tag: &str) -> (Option<Concept>, Role) {
    match Concept::from_tag(tag) {
        Some(concept) => (Some(concept), concept.role()),
        None => (None, Role::Independent),
    }
}
