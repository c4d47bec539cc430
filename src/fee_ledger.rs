//! Fee Ledger - payment records in a binary search tree
//!
//! Keyed by student ID with byte-wise string ordering. The tree is NOT
//! rebalanced: inserting keys in sorted order degrades it to a linked list
//! and every operation becomes O(n). [`FeeLedger::height`] exposes this.
//!
//! # Complexity:
//! | Operation | Time |
//! |-----------|------|
//! | add_record | O(height) |
//! | find / update_amount | O(height) |
//! | generate_report | O(n) |
//!
//! Traversals use an explicit stack, so a degenerate tree cannot overflow
//! the call stack.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::core_types::StudentId;
use crate::error::{AdminError, AdminResult, Entity};

/// Payment status, derived at read time from the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeStatus {
    /// balance <= 0
    Cleared,
    Pending,
}

impl FeeStatus {
    #[inline]
    pub fn from_balance(balance: Decimal) -> Self {
        if balance <= Decimal::ZERO {
            FeeStatus::Cleared
        } else {
            FeeStatus::Pending
        }
    }
}

/// Read-side view of one ledger node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeRecord {
    pub student_id: StudentId,
    pub amount_paid: Decimal,
    pub total_fee: Decimal,
    pub balance: Decimal,
    pub status: FeeStatus,
}

#[derive(Debug)]
struct PaymentNode {
    student_id: StudentId,
    amount_paid: Decimal,
    total_fee: Decimal, // immutable after creation
    balance: Decimal,   // total_fee - amount_paid, recomputed on every payment change
    left: Option<Box<PaymentNode>>,
    right: Option<Box<PaymentNode>>,
}

/// `total_fee - amount_paid`, or `None` when it leaves the `Decimal` range
#[inline]
fn checked_balance(amount_paid: Decimal, total_fee: Decimal) -> Option<Decimal> {
    total_fee.checked_sub(amount_paid)
}

impl PaymentNode {
    fn new(
        student_id: StudentId,
        amount_paid: Decimal,
        total_fee: Decimal,
        balance: Decimal,
    ) -> Self {
        Self {
            student_id,
            amount_paid,
            total_fee,
            balance,
            left: None,
            right: None,
        }
    }

    fn set_amount_paid(&mut self, amount_paid: Decimal, balance: Decimal) {
        self.amount_paid = amount_paid;
        self.balance = balance;
    }

    fn to_record(&self) -> FeeRecord {
        FeeRecord {
            student_id: self.student_id.clone(),
            amount_paid: self.amount_paid,
            total_fee: self.total_fee,
            balance: self.balance,
            status: FeeStatus::from_balance(self.balance),
        }
    }
}

#[derive(Debug, Default)]
pub struct FeeLedger {
    root: Option<Box<PaymentNode>>,
    len: usize,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new payment record.
    ///
    /// # Errors
    /// `AlreadyExists` if the student already has a record anywhere in the
    /// tree, `AmountOutOfRange` if the balance is not representable. The
    /// tree is left untouched.
    pub fn add_record(
        &mut self,
        student_id: impl Into<StudentId>,
        amount_paid: Decimal,
        total_fee: Decimal,
    ) -> AdminResult<()> {
        let student_id = student_id.into();
        let Some(balance) = checked_balance(amount_paid, total_fee) else {
            warn!(
                student_id = %student_id,
                %amount_paid,
                %total_fee,
                "Payment record rejected: balance overflow"
            );
            return Err(AdminError::AmountOutOfRange { student_id });
        };

        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match student_id.as_str().cmp(node.student_id.as_str()) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => {
                    warn!(student_id = %student_id, "Payment record already exists");
                    return Err(AdminError::already_exists(Entity::PaymentRecord, student_id));
                }
            };
        }

        info!(
            student_id = %student_id,
            %amount_paid,
            %total_fee,
            "Payment record added"
        );
        *slot = Some(Box::new(PaymentNode::new(
            student_id,
            amount_paid,
            total_fee,
            balance,
        )));
        self.len += 1;
        Ok(())
    }

    fn search(&self, student_id: &str) -> Option<&PaymentNode> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match student_id.cmp(node.student_id.as_str()) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    fn search_mut(&mut self, student_id: &str) -> Option<&mut PaymentNode> {
        let mut cur = self.root.as_deref_mut();
        while let Some(node) = cur {
            match student_id.cmp(node.student_id.as_str()) {
                Ordering::Less => cur = node.left.as_deref_mut(),
                Ordering::Greater => cur = node.right.as_deref_mut(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    pub fn find(&self, student_id: &str) -> AdminResult<FeeRecord> {
        debug!(student_id, "Fee ledger lookup");
        self.search(student_id)
            .map(PaymentNode::to_record)
            .ok_or_else(|| AdminError::not_found(Entity::PaymentRecord, student_id))
    }

    /// Overwrite the amount paid and recompute the balance.
    /// The total fee never changes.
    ///
    /// # Errors
    /// `NotFound` for an unknown student, `AmountOutOfRange` if the new
    /// balance is not representable. The record is left untouched.
    pub fn update_amount(&mut self, student_id: &str, new_amount: Decimal) -> AdminResult<()> {
        let Some(node) = self.search_mut(student_id) else {
            warn!(student_id, "Payment update rejected: record not found");
            return Err(AdminError::not_found(Entity::PaymentRecord, student_id));
        };
        let Some(balance) = checked_balance(new_amount, node.total_fee) else {
            warn!(student_id, %new_amount, "Payment update rejected: balance overflow");
            return Err(AdminError::AmountOutOfRange {
                student_id: student_id.to_string(),
            });
        };

        node.set_amount_paid(new_amount, balance);
        info!(
            student_id,
            amount_paid = %node.amount_paid,
            balance = %node.balance,
            "Payment record updated"
        );
        Ok(())
    }

    /// All records in ascending student ID order (in-order traversal)
    pub fn generate_report(&self) -> Vec<FeeRecord> {
        let mut report = Vec::with_capacity(self.len);
        let mut stack: Vec<&PaymentNode> = Vec::new();
        let mut cur = self.root.as_deref();

        while cur.is_some() || !stack.is_empty() {
            while let Some(node) = cur {
                stack.push(node);
                cur = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                report.push(node.to_record());
                cur = node.right.as_deref();
            }
        }
        report
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty)
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&PaymentNode, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for FeeLedger {
    // Box's recursive drop would recurse once per level of a degenerate tree.
    fn drop(&mut self) {
        let mut stack: Vec<Box<PaymentNode>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}
