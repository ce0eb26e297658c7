//! Built-in portfolio of case studies offered for the showcase pages.

use crate::document::CaseStudyRef;

struct Entry {
    id: &'static str,
    title: &'static str,
    summary: &'static str,
    link: &'static str,
    category: &'static str,
}

impl Entry {
    fn to_ref(&self) -> CaseStudyRef {
        CaseStudyRef {
            id: self.id.to_string(),
            title: self.title.to_string(),
            summary: self.summary.to_string(),
            link: self.link.to_string(),
            category: self.category.to_string(),
        }
    }
}

const CATALOG: &[Entry] = &[
    Entry {
        id: "dynamic-promotions",
        title: "Dynamic Promotions in NetSuite SuiteCommerce",
        summary: "Turning manual promotion pages into dynamic, automated experiences",
        link: "https://brokenrubik.com/case-studies/dynamic-promotions-in-netsuite-suitecommerce",
        category: "SuiteCommerce",
    },
    Entry {
        id: "shopify-netsuite",
        title: "Shopify Ordering, NetSuite Processing",
        summary: "Unified NetSuite and Shopify integration for seamless order flow",
        link: "https://brokenrubik.com/case-studies/shopify-netsuite",
        category: "Integration",
    },
    Entry {
        id: "performance-overhaul",
        title: "Performance Overhaul for SuiteCommerce",
        summary: "Boosting speed and conversions with targeted technical optimization",
        link: "https://brokenrubik.com/case-studies/performance-overhaul-for-icrealtime-suitecommerce-store",
        category: "Performance",
    },
    Entry {
        id: "suitecommerce-to-shopify",
        title: "From SuiteCommerce to Shopify",
        summary: "Rebuilding eCommerce for speed, search, and scalability",
        link: "https://brokenrubik.com/case-studies/from-suitecommerce-to-shopify",
        category: "Migration",
    },
    Entry {
        id: "netsuite-deposco",
        title: "NetSuite-Deposco Warehouse Integration",
        summary: "Seamless NetSuite-WMS sync for accurate warehouse operations",
        link: "https://brokenrubik.com/case-studies/netsuite-deposco-integration",
        category: "Integration",
    },
    Entry {
        id: "klim-b2b",
        title: "KLIM Collaborative B2B Order Manager",
        summary: "From Excel spreadsheets to a seamless digital ordering tool",
        link: "https://brokenrubik.com/case-studies/klim-preseason",
        category: "B2B",
    },
    Entry {
        id: "kenwood-draft-orders",
        title: "Kenwood: Draft Orders in SuiteCommerce",
        summary: "Enable multiple in-progress B2B orders without cart limitations",
        link: "https://brokenrubik.com/case-studies/draft-orders-in-suitecommerce",
        category: "B2B",
    },
    Entry {
        id: "inventory-sync",
        title: "Inventory Sync: NetSuite & Adobe Commerce",
        summary: "Making inventory synchronization fast and reliable",
        link: "https://brokenrubik.com/case-studies/inventory-synchronization-between-netsuite-and-adobe-commerce",
        category: "Integration",
    },
    Entry {
        id: "hubspot-netsuite",
        title: "Bridging HubSpot and NetSuite with Celigo",
        summary: "Automating Sales Order Synchronization across platforms",
        link: "https://brokenrubik.com/case-studies/hubspot-netsuite-celigo-automate-sales-orders",
        category: "Integration",
    },
    Entry {
        id: "inventory-dashboard",
        title: "Designer Wellness: Inventory Dashboard",
        summary: "Smart inventory view in NetSuite for Amazon fulfillment",
        link: "https://brokenrubik.com/case-studies/netsuite-inventory-management-amazon",
        category: "NetSuite",
    },
    Entry {
        id: "landed-cost",
        title: "WeLink: Landed Cost Automation",
        summary: "Enhancing cost visibility in multi-step purchase flows",
        link: "https://brokenrubik.com/case-studies/welink-landed-cost-automation-for-supply-chain-accuracy",
        category: "NetSuite",
    },
    Entry {
        id: "stinger-redesign",
        title: "Stinger: UX/UI Redesign",
        summary: "UX/UI modernization to implement branding",
        link: "https://brokenrubik.com/case-studies/stinger-redesign",
        category: "Design",
    },
    Entry {
        id: "variant-navigation",
        title: "Smarter Product Variant Navigation",
        summary: "Simplifying Product Variant Navigation with Custom Structures",
        link: "https://brokenrubik.com/case-studies/smarter-product-variant-navigation-on-suitecommerce",
        category: "SuiteCommerce",
    },
    Entry {
        id: "klaviyo",
        title: "Klaviyo Integration",
        summary: "Seamless Transaction Sync: NetSuite with Klaviyo",
        link: "https://brokenrubik.com/case-studies/klaviyo-integration",
        category: "Integration",
    },
    Entry {
        id: "blog-suitecommerce",
        title: "Blog Posting Made Easy for SuiteCommerce",
        summary: "An exclusive product by BrokenRubik",
        link: "https://brokenrubik.com/case-studies/blog-posting-made-easy-for-suitecommerce",
        category: "SuiteCommerce",
    },
    Entry {
        id: "deckmatch",
        title: "Deckmatch",
        summary: "Simplifying Deck Plug and Screw Selection for DIY Customers",
        link: "https://brokenrubik.com/case-studies/deckmatch",
        category: "Product",
    },
    Entry {
        id: "prescription",
        title: "Prescription Management and Patient Care",
        summary: "A UX case study with Oborne Health Supplies",
        link: "https://brokenrubik.com/case-studies/prescription-management",
        category: "UX",
    },
    Entry {
        id: "godatafeed",
        title: "Streamlining Sales and Order Management",
        summary: "Integration connecting GoDataFeed and NetSuite",
        link: "https://brokenrubik.com/case-studies/streamlining-sales",
        category: "Integration",
    },
    Entry {
        id: "pergola",
        title: "Pergola Planner",
        summary: "Empowering DIY Pergola Customization and Purchase",
        link: "https://brokenrubik.com/case-studies/pergola-planner",
        category: "Product",
    },
    Entry {
        id: "cartridges",
        title: "Cartridges Direct",
        summary: "Find your cartridges in three easy steps",
        link: "https://brokenrubik.com/case-studies/cartridges-direct",
        category: "Product",
    },
    Entry {
        id: "amp-tab",
        title: "B2B Order Management with AMP Tab",
        summary: "AMP Tab and NetSuite Integration for RST Brands",
        link: "https://brokenrubik.com/case-studies/b2b-amp-tab",
        category: "B2B",
    },
];

/// Selection used for new quotes.
const DEFAULT_IDS: [&str; 6] = [
    "dynamic-promotions",
    "shopify-netsuite",
    "performance-overhaul",
    "suitecommerce-to-shopify",
    "netsuite-deposco",
    "klim-b2b",
];

/// Every case study, in catalog order.
pub fn all() -> Vec<CaseStudyRef> {
    CATALOG.iter().map(Entry::to_ref).collect()
}

/// Case studies for `ids`, in the order requested. Unknown ids are skipped.
pub fn by_ids<S: AsRef<str>>(ids: &[S]) -> Vec<CaseStudyRef> {
    ids.iter()
        .filter_map(|id| {
            let id = id.as_ref().trim();
            let found = CATALOG.iter().find(|e| e.id == id);
            if found.is_none() {
                log::warn!("Unknown case study id {id:?}, skipping");
            }
            found.map(Entry::to_ref)
        })
        .collect()
}

pub fn default_ids() -> Vec<&'static str> {
    DEFAULT_IDS.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_keeps_requested_order() {
        let found = by_ids(&["klim-b2b", "nope", "dynamic-promotions"]);
        let ids: Vec<_> = found.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["klim-b2b", "dynamic-promotions"]);
    }

    #[test]
    fn defaults_resolve_to_catalog_entries() {
        assert_eq!(by_ids(&default_ids()).len(), 6);
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = CATALOG.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all().len());
        assert_eq!(all().len(), 21);
    }
}
