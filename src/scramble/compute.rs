use serde::Serialize;

use super::taxonomy::Concept;

/// Ending balances below this are replaced by it.
pub const MIN_ENDING_CASH: i64 = 10_000;

/// Independent inputs for one reporting period. Missing lines are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodInputs {
    pub net_income: i64,
    pub depreciation: i64,
    pub share_based_comp: i64,
    pub deferred_tax: i64,
    pub other_noncash: i64,
    pub accounts_receivable: i64,
    pub inventories: i64,
    pub other_receivables: i64,
    pub other_operating_assets: i64,
    pub accounts_payable: i64,
    pub deferred_revenue: i64,
    pub other_operating_liabilities: i64,

    pub payments_securities: i64,
    pub proceeds_securities: i64,
    pub proceeds_maturities: i64,
    pub capex: i64,
    pub acquisitions: i64,
    pub other_investing: i64,

    pub debt_proceeds: i64,
    pub debt_repayments: i64,
    pub share_repurchases: i64,
    pub dividends: i64,
    pub tax_withholding: i64,
    pub commercial_paper: i64,
    pub other_financing: i64,

    pub beginning_cash: i64,
}

/// Recomputed subtotals for one reporting period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub operating: i64,
    pub investing: i64,
    pub financing: i64,
    pub cash_change: i64,
    /// `beginning_cash + cash_change` before the floor is applied.
    pub ending_cash_unfloored: i64,
    pub ending_cash: i64,
}

impl PeriodInputs {
    /// Stores `amount` under `concept`. Returns false for concepts that are
    /// not inputs (the totals).
    pub fn set(&mut self, concept: Concept, amount: i64) -> bool {
        let slot = match concept {
            Concept::NetIncome => &mut self.net_income,
            Concept::Depreciation => &mut self.depreciation,
            Concept::ShareBasedCompensation => &mut self.share_based_comp,
            Concept::DeferredIncomeTax => &mut self.deferred_tax,
            Concept::OtherNoncash => &mut self.other_noncash,
            Concept::AccountsReceivableChange => &mut self.accounts_receivable,
            Concept::InventoriesChange => &mut self.inventories,
            Concept::OtherReceivablesChange => &mut self.other_receivables,
            Concept::OtherOperatingAssetsChange => &mut self.other_operating_assets,
            Concept::AccountsPayableChange => &mut self.accounts_payable,
            Concept::DeferredRevenueChange => &mut self.deferred_revenue,
            Concept::OtherOperatingLiabilitiesChange => &mut self.other_operating_liabilities,
            Concept::PaymentsForSecurities => &mut self.payments_securities,
            Concept::ProceedsFromSecuritiesSales => &mut self.proceeds_securities,
            Concept::ProceedsFromMaturities => &mut self.proceeds_maturities,
            Concept::CapitalExpenditure => &mut self.capex,
            Concept::Acquisitions => &mut self.acquisitions,
            Concept::OtherInvesting => &mut self.other_investing,
            Concept::DebtProceeds => &mut self.debt_proceeds,
            Concept::DebtRepayments => &mut self.debt_repayments,
            Concept::ShareRepurchases => &mut self.share_repurchases,
            Concept::Dividends => &mut self.dividends,
            Concept::TaxWithholding => &mut self.tax_withholding,
            Concept::CommercialPaper => &mut self.commercial_paper,
            Concept::OtherFinancing => &mut self.other_financing,
            Concept::CashBalance => &mut self.beginning_cash,
            Concept::OperatingTotal
            | Concept::InvestingTotal
            | Concept::FinancingTotal
            | Concept::CashChange => return false,
        };
        *slot = amount;
        true
    }

    pub fn operating_total(&self) -> i64 {
        saturate(
            [
                self.net_income,
                self.depreciation,
                self.share_based_comp,
                self.deferred_tax,
                self.accounts_receivable,
                self.accounts_payable,
                self.inventories,
                self.other_receivables,
                self.other_operating_assets,
                self.deferred_revenue,
                self.other_operating_liabilities,
                self.other_noncash,
            ]
            .iter()
            .map(|&v| v as i128)
            .sum(),
        )
    }

    pub fn investing_total(&self) -> i64 {
        let inflows = self.proceeds_securities as i128 + self.proceeds_maturities as i128;
        let outflows = self.payments_securities as i128
            + self.capex as i128
            + self.acquisitions as i128
            + self.other_investing as i128;
        saturate(inflows - outflows)
    }

    pub fn financing_total(&self) -> i64 {
        let inflows = self.debt_proceeds as i128
            + self.commercial_paper as i128
            + self.other_financing as i128;
        let outflows = self.debt_repayments as i128
            + self.share_repurchases as i128
            + self.dividends as i128
            + self.tax_withholding as i128;
        saturate(inflows - outflows)
    }

    pub fn totals(&self) -> PeriodTotals {
        let operating = self.operating_total();
        let investing = self.investing_total();
        let financing = self.financing_total();
        let cash_change = saturate(operating as i128 + investing as i128 + financing as i128);
        let ending_cash_unfloored = saturate(self.beginning_cash as i128 + cash_change as i128);

        PeriodTotals {
            operating,
            investing,
            financing,
            cash_change,
            ending_cash_unfloored,
            ending_cash: ending_cash_unfloored.max(MIN_ENDING_CASH),
        }
    }
}

/// Sums are taken in `i128` and clamped to `[-i64::MAX, i64::MAX]`, so the
/// identities are exact for any total that fits and `abs()` never overflows.
fn saturate(value: i128) -> i64 {
    value.clamp(-(i64::MAX as i128), i64::MAX as i128) as i64
}

impl PeriodTotals {
    /// Value a dependent fact of `concept` takes in this period.
    /// A dependent `CashBalance` is an ending balance.
    pub fn value_for(&self, concept: Concept) -> Option<i64> {
        match concept {
            Concept::OperatingTotal => Some(self.operating),
            Concept::InvestingTotal => Some(self.investing),
            Concept::FinancingTotal => Some(self.financing),
            Concept::CashChange => Some(self.cash_change),
            Concept::CashBalance => Some(self.ending_cash),
            _ => None,
        }
    }
}
