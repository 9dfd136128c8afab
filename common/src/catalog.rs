//! 業界ベンチマークカタログ
//!
//! 業界ごとの代表的なプロセス（主要/支援/管理）、標準的な関係、
//! リスク、KPIを保持する参照データ。実行時に変更されることはない。
//! 組み込みデータのほか、JSONから独自カタログを読み込める。

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 標準的な関係のテンプレート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTemplate {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub description: String,
}

/// 業界ベンチマーク（カタログの1エントリ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    pub industry: String,
    #[serde(default)]
    pub core_processes: Vec<String>,
    #[serde(default)]
    pub support_processes: Vec<String>,
    #[serde(default)]
    pub management_processes: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<InteractionTemplate>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<String>,
}

/// 大文字小文字・前後空白を無視した所属判定
fn contains_name(list: &[String], name: &str) -> bool {
    let name = name.trim().to_lowercase();
    list.iter().any(|p| p.to_lowercase() == name)
}

impl IndustryBenchmark {
    pub fn is_core(&self, name: &str) -> bool {
        contains_name(&self.core_processes, name)
    }

    pub fn is_support(&self, name: &str) -> bool {
        contains_name(&self.support_processes, name)
    }

    pub fn is_management(&self, name: &str) -> bool {
        contains_name(&self.management_processes, name)
    }

    /// 全プロセス名（主要 → 支援 → 管理）
    pub fn all_processes(&self) -> impl Iterator<Item = &String> {
        self.core_processes
            .iter()
            .chain(self.support_processes.iter())
            .chain(self.management_processes.iter())
    }
}

/// ベンチマークカタログ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkCatalog {
    industries: Vec<IndustryBenchmark>,
}

lazy_static::lazy_static! {
    static ref BUILTIN: BenchmarkCatalog = BenchmarkCatalog::from_entries(builtin_entries());
}

impl BenchmarkCatalog {
    /// 組み込みカタログ
    pub fn builtin() -> &'static BenchmarkCatalog {
        &BUILTIN
    }

    pub fn from_entries(industries: Vec<IndustryBenchmark>) -> Self {
        Self { industries }
    }

    /// JSON文字列から読み込み（配列 or {"industries": [...]} の両形式）
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            let industries: Vec<IndustryBenchmark> = serde_json::from_value(value)?;
            Ok(Self { industries })
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// 全エントリ（カタログ順）
    pub fn industries(&self) -> &[IndustryBenchmark] {
        &self.industries
    }

    /// 業界ラベルで完全一致検索（大文字小文字は無視）
    pub fn get(&self, industry: &str) -> Option<&IndustryBenchmark> {
        let lower = industry.to_lowercase();
        self.industries
            .iter()
            .find(|b| b.industry.to_lowercase() == lower)
    }

    pub fn len(&self) -> usize {
        self.industries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn templates(items: &[(&str, &str, &str)]) -> Vec<InteractionTemplate> {
    items
        .iter()
        .map(|(from, to, description)| InteractionTemplate {
            from: from.to_string(),
            to: to.to_string(),
            description: description.to_string(),
        })
        .collect()
}

// ============================================
// 組み込みデータ
// ============================================

fn builtin_entries() -> Vec<IndustryBenchmark> {
    vec![
        IndustryBenchmark {
            industry: "Manufacturing".into(),
            core_processes: strings(&[
                "Production Planning",
                "Procurement & Sourcing",
                "Manufacturing Operations",
                "Quality Control",
                "Order Fulfillment & Shipping",
            ]),
            support_processes: strings(&[
                "Maintenance & Engineering",
                "Human Resources",
                "Inventory & Warehouse Management",
                "IT & Systems",
                "Health, Safety & Environment",
            ]),
            management_processes: strings(&[
                "Strategic Planning",
                "Management Review",
                "Continuous Improvement",
            ]),
            interactions: templates(&[
                ("Production Planning", "Procurement & Sourcing", "Material requirements"),
                ("Procurement & Sourcing", "Manufacturing Operations", "Raw materials and components"),
                ("Manufacturing Operations", "Quality Control", "Finished goods for inspection"),
                ("Quality Control", "Order Fulfillment & Shipping", "Released products"),
                ("Quality Control", "Manufacturing Operations", "Nonconformance feedback"),
                ("Maintenance & Engineering", "Manufacturing Operations", "Equipment availability"),
            ]),
            risks: strings(&[
                "Supply chain disruption",
                "Equipment breakdown",
                "Product quality defects",
                "Workplace safety incidents",
                "Inventory obsolescence",
            ]),
            kpis: strings(&[
                "Overall equipment effectiveness (OEE)",
                "On-time delivery rate",
                "First pass yield",
                "Scrap and rework rate",
                "Inventory turnover",
            ]),
        },
        IndustryBenchmark {
            industry: "Software Development".into(),
            core_processes: strings(&[
                "Requirements Analysis",
                "Software Design & Architecture",
                "Development & Coding",
                "Testing & Quality Assurance",
                "Release & Deployment",
            ]),
            support_processes: strings(&[
                "Customer Support",
                "DevOps & Infrastructure",
                "Information Security",
                "Human Resources",
            ]),
            management_processes: strings(&[
                "Product Management",
                "Project Management",
                "Management Review",
            ]),
            interactions: templates(&[
                ("Requirements Analysis", "Software Design & Architecture", "Approved requirements"),
                ("Software Design & Architecture", "Development & Coding", "Technical design"),
                ("Development & Coding", "Testing & Quality Assurance", "Build for testing"),
                ("Testing & Quality Assurance", "Release & Deployment", "Release candidate"),
                ("Testing & Quality Assurance", "Development & Coding", "Defect reports"),
                ("Customer Support", "Requirements Analysis", "Customer feedback"),
            ]),
            risks: strings(&[
                "Scope creep",
                "Security vulnerabilities",
                "Technical debt accumulation",
                "Production outages",
                "Key personnel dependency",
            ]),
            kpis: strings(&[
                "Deployment frequency",
                "Defect escape rate",
                "Lead time for changes",
                "Mean time to recovery",
                "Customer satisfaction score",
            ]),
        },
        IndustryBenchmark {
            industry: "Healthcare".into(),
            core_processes: strings(&[
                "Patient Registration & Admission",
                "Clinical Assessment & Diagnosis",
                "Treatment & Care Delivery",
                "Discharge Planning",
                "Follow-up Care",
            ]),
            support_processes: strings(&[
                "Pharmacy Management",
                "Medical Records Management",
                "Billing & Claims",
                "Facilities & Biomedical Engineering",
            ]),
            management_processes: strings(&[
                "Clinical Governance",
                "Patient Safety Oversight",
                "Strategic Planning",
            ]),
            interactions: templates(&[
                ("Patient Registration & Admission", "Clinical Assessment & Diagnosis", "Patient record"),
                ("Clinical Assessment & Diagnosis", "Treatment & Care Delivery", "Care plan"),
                ("Treatment & Care Delivery", "Discharge Planning", "Treatment summary"),
                ("Discharge Planning", "Follow-up Care", "Discharge instructions"),
                ("Pharmacy Management", "Treatment & Care Delivery", "Medication supply"),
            ]),
            risks: strings(&[
                "Medication errors",
                "Hospital-acquired infections",
                "Patient data breaches",
                "Staff shortages",
                "Regulatory non-compliance",
            ]),
            kpis: strings(&[
                "Average length of stay",
                "Readmission rate",
                "Patient satisfaction score",
                "Bed occupancy rate",
                "Medication error rate",
            ]),
        },
        IndustryBenchmark {
            industry: "Financial Services".into(),
            core_processes: strings(&[
                "Client Onboarding & KYC",
                "Account Management",
                "Transaction Processing",
                "Lending & Credit Assessment",
                "Customer Service",
            ]),
            support_processes: strings(&[
                "IT & Cybersecurity",
                "Compliance Monitoring",
                "Finance & Accounting",
                "Human Resources",
            ]),
            management_processes: strings(&[
                "Risk Management",
                "Internal Audit",
                "Executive Governance",
            ]),
            interactions: templates(&[
                ("Client Onboarding & KYC", "Account Management", "Verified client profile"),
                ("Account Management", "Transaction Processing", "Account instructions"),
                ("Lending & Credit Assessment", "Account Management", "Approved credit facilities"),
                ("Compliance Monitoring", "Client Onboarding & KYC", "Screening results"),
            ]),
            risks: strings(&[
                "Fraud and financial crime",
                "Regulatory breaches",
                "Credit default",
                "Cyber attacks",
                "Operational errors",
            ]),
            kpis: strings(&[
                "Client onboarding time",
                "Transaction error rate",
                "Non-performing loan ratio",
                "Net promoter score",
                "Cost-to-income ratio",
            ]),
        },
        IndustryBenchmark {
            industry: "Consulting".into(),
            core_processes: strings(&[
                "Business Development",
                "Proposal & Engagement Planning",
                "Engagement Delivery",
                "Client Reporting",
                "Engagement Close-out",
            ]),
            support_processes: strings(&[
                "Knowledge Management",
                "Resource & Staffing Management",
                "Finance & Billing",
                "IT Services",
            ]),
            management_processes: strings(&[
                "Practice Leadership",
                "Quality Review",
                "Strategic Planning",
            ]),
            interactions: templates(&[
                ("Business Development", "Proposal & Engagement Planning", "Qualified opportunities"),
                ("Proposal & Engagement Planning", "Engagement Delivery", "Signed statement of work"),
                ("Engagement Delivery", "Client Reporting", "Findings and deliverables"),
                ("Client Reporting", "Engagement Close-out", "Client acceptance"),
                ("Knowledge Management", "Engagement Delivery", "Methodologies and templates"),
            ]),
            risks: strings(&[
                "Scope creep",
                "Consultant utilization shortfall",
                "Client dissatisfaction",
                "Knowledge loss on staff turnover",
                "Fee overruns",
            ]),
            kpis: strings(&[
                "Billable utilization rate",
                "Proposal win rate",
                "Project margin",
                "Client satisfaction score",
                "Repeat business rate",
            ]),
        },
        IndustryBenchmark {
            industry: "Retail".into(),
            core_processes: strings(&[
                "Merchandise Planning",
                "Purchasing",
                "Store Operations",
                "Sales & Checkout",
                "Returns Handling",
            ]),
            support_processes: strings(&[
                "Supply Chain & Distribution",
                "Marketing & Promotions",
                "Human Resources",
                "Point of Sale Systems",
            ]),
            management_processes: strings(&[
                "Category Review",
                "Loss Prevention Oversight",
                "Strategic Planning",
            ]),
            interactions: templates(&[
                ("Merchandise Planning", "Purchasing", "Assortment plan"),
                ("Purchasing", "Store Operations", "Stock deliveries"),
                ("Store Operations", "Sales & Checkout", "Shelf-ready merchandise"),
                ("Sales & Checkout", "Returns Handling", "Sales receipts"),
            ]),
            risks: strings(&[
                "Stockouts",
                "Shrinkage and theft",
                "Demand forecast errors",
                "Payment system failures",
            ]),
            kpis: strings(&[
                "Sales per square foot",
                "Inventory turnover",
                "Gross margin return on investment",
                "Shrinkage rate",
            ]),
        },
        IndustryBenchmark {
            industry: "Construction".into(),
            core_processes: strings(&[
                "Bidding & Estimating",
                "Project Planning & Scheduling",
                "Site Preparation",
                "Construction Execution",
                "Inspection & Handover",
            ]),
            support_processes: strings(&[
                "Procurement & Subcontracting",
                "Equipment Management",
                "Health & Safety",
                "Document Control",
            ]),
            management_processes: strings(&[
                "Project Controls Review",
                "Risk Management",
                "Management Review",
            ]),
            interactions: templates(&[
                ("Bidding & Estimating", "Project Planning & Scheduling", "Awarded contract"),
                ("Project Planning & Scheduling", "Site Preparation", "Baseline schedule"),
                ("Site Preparation", "Construction Execution", "Prepared site"),
                ("Construction Execution", "Inspection & Handover", "Completed works"),
                ("Inspection & Handover", "Construction Execution", "Punch list"),
            ]),
            risks: strings(&[
                "Schedule delays",
                "Cost overruns",
                "Site safety incidents",
                "Subcontractor default",
                "Design changes",
            ]),
            kpis: strings(&[
                "Schedule performance index",
                "Cost performance index",
                "Lost time injury frequency",
                "Rework cost ratio",
            ]),
        },
        IndustryBenchmark {
            industry: "Logistics & Transportation".into(),
            core_processes: strings(&[
                "Order Intake",
                "Route Planning",
                "Warehousing & Storage",
                "Freight Transport",
                "Proof of Delivery",
            ]),
            support_processes: strings(&[
                "Fleet Maintenance",
                "Customs & Compliance",
                "Driver Recruitment & Training",
                "Transport Management Systems",
            ]),
            management_processes: strings(&[
                "Performance Review",
                "Carrier Management",
                "Strategic Planning",
            ]),
            interactions: templates(&[
                ("Order Intake", "Route Planning", "Shipment orders"),
                ("Route Planning", "Freight Transport", "Dispatch plan"),
                ("Warehousing & Storage", "Freight Transport", "Picked and packed goods"),
                ("Freight Transport", "Proof of Delivery", "Delivered consignments"),
            ]),
            risks: strings(&[
                "Delivery delays",
                "Cargo damage or loss",
                "Fuel price volatility",
                "Driver shortages",
            ]),
            kpis: strings(&[
                "On-time delivery rate",
                "Cost per mile",
                "Fleet utilization",
                "Order accuracy",
            ]),
        },
    ]
}
